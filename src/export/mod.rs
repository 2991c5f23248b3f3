pub mod to_csv_edges;
pub mod to_csv_nodes;

use std::error::Error;

use csv::Writer;

use crate::table::Table;

/// Renders a table as CSV with `preferred` columns first (those present),
/// remaining columns in table order, all values stringified.
pub(crate) fn render_ordered(table: &Table, preferred: &[&str]) -> Result<String, Box<dyn Error>> {
    let mut header: Vec<String> = preferred
        .iter()
        .filter(|name| table.has_column(name))
        .map(|name| name.to_string())
        .collect();
    for name in table.column_names() {
        if !header.contains(&name) {
            header.push(name);
        }
    }

    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(&header)?;
    for row in 0..table.len() {
        let record: Vec<String> = header
            .iter()
            .map(|name| {
                table
                    .get(row, name)
                    .map(|value| value.to_text())
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}
