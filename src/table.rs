use indexmap::IndexMap;
use thiserror::Error;

/// A single typed cell. The service boundary only ever sees the text form
/// produced by [`Value::to_text`]; inside the pipeline values stay typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Uniform text representation used for transport and CSV export.
    /// Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("no column named '{0}'")]
    NoSuchColumn(String),
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("column '{name}' has {got} values, table has {expected} rows")]
    LengthMismatch {
        name: String,
        got: usize,
        expected: usize,
    },
}

/// An in-memory table with ordered, named columns of uniform length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
    len: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|values| values.get(row))
    }

    /// Appends one row. Columns not yet present are created and backfilled
    /// with nulls; existing columns absent from `values` receive a null.
    pub fn push_row(&mut self, values: Vec<(&str, Value)>) {
        let len = self.len;
        let mut seen: Vec<&str> = Vec::with_capacity(values.len());
        for (name, value) in values {
            let column = self
                .columns
                .entry(name.to_string())
                .or_insert_with(|| vec![Value::Null; len]);
            column.push(value);
            seen.push(name);
        }
        for (name, column) in &mut self.columns {
            if !seen.contains(&name.as_str()) {
                column.push(Value::Null);
            }
        }
        self.len += 1;
    }

    /// Adds a column holding the same value in every row.
    pub fn add_constant_column(&mut self, name: &str, value: Value) -> Result<(), TableError> {
        self.add_column(name, vec![value; self.len])
    }

    pub fn add_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if self.columns.contains_key(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.len {
            return Err(TableError::LengthMismatch {
                name: name.to_string(),
                got: values.len(),
                expected: self.len,
            });
        }
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    /// Renames a column in place, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), TableError> {
        if !self.columns.contains_key(from) {
            return Err(TableError::NoSuchColumn(from.to_string()));
        }
        if self.columns.contains_key(to) {
            return Err(TableError::DuplicateColumn(to.to_string()));
        }
        let renamed = self
            .columns
            .drain(..)
            .map(|(name, values)| {
                if name == from {
                    (to.to_string(), values)
                } else {
                    (name, values)
                }
            })
            .collect();
        self.columns = renamed;
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Value>> {
        self.columns.shift_remove(name)
    }

    /// Row-wise concatenation. The resulting schema is the ordered union of
    /// both column sets; values missing on either side become nulls.
    pub fn vstack(&mut self, other: Table) {
        let self_len = self.len;
        for name in other.columns.keys() {
            if !self.columns.contains_key(name) {
                self.columns
                    .insert(name.clone(), vec![Value::Null; self_len]);
            }
        }
        for (name, column) in &mut self.columns {
            match other.columns.get(name) {
                Some(values) => column.extend(values.iter().cloned()),
                None => column.extend(std::iter::repeat(Value::Null).take(other.len)),
            }
        }
        self.len += other.len;
    }

    /// The explicit stringify-for-transport step: every row as text keyed by
    /// column name, in column order.
    pub fn stringify_records(&self) -> Vec<IndexMap<String, String>> {
        (0..self.len)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(name, values)| (name.clone(), values[row].to_text()))
                    .collect()
            })
            .collect()
    }
}
