use std::error::Error;

use crate::stack::{ID_COLUMN, LAYER_INDEX_COLUMN, Z_COLUMN};
use crate::table::Table;

pub fn render(nodes: &Table) -> Result<String, Box<dyn Error>> {
    super::render_ordered(
        nodes,
        &[ID_COLUMN, "name", "x", "y", Z_COLUMN, LAYER_INDEX_COLUMN],
    )
}
