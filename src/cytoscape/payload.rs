//! Conversions between service JSON and the typed table model. Stringification
//! for transport happens here and nowhere else.

use serde_json::Value as Json;

use crate::table::{Table, Value};

use super::ServiceError;

/// Builds a table from an array of JSON row objects. The schema is the
/// ordered union of the row keys; values keep their JSON type where one of
/// ours matches, everything else is carried as text.
pub fn rows_to_table(rows: &[Json]) -> Result<Table, ServiceError> {
    let mut table = Table::new();
    for row in rows {
        let object = row
            .as_object()
            .ok_or_else(|| ServiceError::Malformed(format!("table row is not an object: {}", row)))?;
        let values: Vec<(&str, Value)> = object
            .iter()
            .map(|(key, value)| (key.as_str(), json_to_value(value)))
            .collect();
        table.push_row(values);
    }
    Ok(table)
}

fn json_to_value(value: &Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// Stringifies a table into JSON row objects for submission. The service API
/// only accepts text, so every cell goes out as a string.
pub fn table_to_rows(table: &Table) -> Vec<Json> {
    table
        .stringify_records()
        .into_iter()
        .map(|record| {
            Json::Object(
                record
                    .into_iter()
                    .map(|(key, value)| (key, Json::String(value)))
                    .collect(),
            )
        })
        .collect()
}

/// Extracts a required numeric field from a JSON object.
pub fn require_i64(value: &Json, field: &str) -> Result<i64, ServiceError> {
    value
        .get(field)
        .and_then(Json::as_i64)
        .ok_or_else(|| ServiceError::Malformed(format!("missing numeric field '{}' in {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_row_objects() {
        let rows = vec![
            json!({"SUID": 101, "name": "a", "x": 12.5}),
            json!({"SUID": 102, "name": "b", "x": 40.0}),
        ];
        let table = rows_to_table(&rows).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "SUID"), Some(&Value::Int(101)));
        assert_eq!(table.get(0, "x"), Some(&Value::Number(12.5)));

        let out = table_to_rows(&table);
        assert_eq!(out[1]["name"], json!("b"));
        assert_eq!(out[1]["x"], json!("40"));
    }

    #[test]
    fn rejects_non_object_rows() {
        let rows = vec![json!([1, 2, 3])];
        assert!(rows_to_table(&rows).is_err());
    }

    #[test]
    fn unions_uneven_rows() {
        let rows = vec![json!({"SUID": 1}), json!({"SUID": 2, "interaction": "pp"})];
        let table = rows_to_table(&rows).unwrap();
        assert_eq!(table.get(0, "interaction"), Some(&Value::Null));
        assert_eq!(table.get(1, "interaction"), Some(&Value::from("pp")));
    }
}
