use std::path::Path;

use anyhow::{anyhow, Result};
use csv::StringRecord;
use regex::Regex;
use tracing::debug;

use crate::cytoscape::NetworkId;

/// One row of the layer input file: which pathway to import, where to place
/// it on the z-axis, and whether its edges get midpoint-split after import.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub index: u32,
    pub pathway: String,
    pub z: f64,
    pub split: bool,
}

/// A descriptor annotated with the network handle returned by the service.
#[derive(Debug, Clone)]
pub struct ImportedLayer {
    pub descriptor: LayerDescriptor,
    pub network: NetworkId,
}

/// Loads layer descriptors from a tab-separated file without a header row:
/// `[layer index, pathway identifier, depth coordinate, split-flag, ...]`.
/// File order defines the stacking order; trailing columns are ignored.
pub fn load_layers(path: &Path) -> Result<Vec<LayerDescriptor>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut layers = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        layers.push(parse_layer_row(&record).map_err(|e| {
            anyhow!("{} row {}: {}", path.display(), row + 1, e)
        })?);
    }
    debug!("Loaded {} layer descriptors from {}", layers.len(), path.display());
    Ok(layers)
}

fn field<'a>(record: &'a StringRecord, idx: usize, label: &str) -> Result<&'a str> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing {} column", label))
}

fn parse_layer_row(record: &StringRecord) -> Result<LayerDescriptor> {
    let index = field(record, 0, "layer index")?
        .parse::<u32>()
        .map_err(|e| anyhow!("bad layer index: {}", e))?;
    let pathway = field(record, 1, "pathway identifier")?.to_string();
    if pathway.is_empty() {
        return Err(anyhow!("empty pathway identifier"));
    }
    let z = field(record, 2, "depth coordinate")?
        .parse::<f64>()
        .map_err(|e| anyhow!("bad depth coordinate: {}", e))?;
    let split = is_truthy(field(record, 3, "split flag")?);

    Ok(LayerDescriptor {
        index,
        pathway,
        z,
        split,
    })
}

fn is_truthy(s: &str) -> bool {
    let trimmed_lowercase = s.trim().to_lowercase();
    let re = Regex::new(r"(true|y|yes)").unwrap();
    re.is_match(&trimmed_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("true"));
        assert!(is_truthy("True"));
        assert!(is_truthy("y"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("  yes  "));

        assert!(!is_truthy("false"));
        assert!(!is_truthy("n"));
        assert!(!is_truthy("NO"));
        assert!(!is_truthy(""));
    }

    fn write_layers(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_rows_in_file_order() {
        let file = write_layers("0\tmap1\t0\tfalse\n1\tmap2\t100\ttrue\n");
        let layers = load_layers(file.path()).unwrap();
        assert_eq!(
            layers,
            vec![
                LayerDescriptor {
                    index: 0,
                    pathway: "map1".to_string(),
                    z: 0.0,
                    split: false,
                },
                LayerDescriptor {
                    index: 1,
                    pathway: "map2".to_string(),
                    z: 100.0,
                    split: true,
                },
            ]
        );
    }

    #[test]
    fn ignores_trailing_columns() {
        let file = write_layers("2\teco01100\t-50.5\tno\textra\tmore\n");
        let layers = load_layers(file.path()).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].pathway, "eco01100");
        assert_eq!(layers[0].z, -50.5);
        assert!(!layers[0].split);
    }

    #[test]
    fn reports_row_for_bad_depth() {
        let file = write_layers("0\tmap1\t0\tfalse\n1\tmap2\tdeep\tfalse\n");
        let err = load_layers(file.path()).unwrap_err().to_string();
        assert!(err.contains("row 2"), "unexpected error: {}", err);
        assert!(err.contains("depth"), "unexpected error: {}", err);
    }
}
