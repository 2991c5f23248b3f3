use std::error::Error;

use crate::stack::{LAYER_INDEX_COLUMN, SOURCE_COLUMN, TARGET_COLUMN};
use crate::table::Table;

pub fn render(edges: &Table) -> Result<String, Box<dyn Error>> {
    super::render_ordered(
        edges,
        &[SOURCE_COLUMN, TARGET_COLUMN, "interaction", LAYER_INDEX_COLUMN],
    )
}
