use serde::{Deserialize, Serialize};

/// ## Structure
/// This module contains the data structures for the plan file.
///
/// ```text
/// Plan
///   ├── meta: Option<PlanMeta>
///   ├── layers: String            (tab-separated layer descriptor file)
///   ├── data_dir: String          (where fetched pathway documents land)
///   ├── service: ServiceConfig    (visualization service endpoint)
///   ├── kegg: KeggConfig          (pathway database endpoint)
///   └── export: ExportProfile
///       └── profiles: Vec<ExportProfileItem>
///           ├── filename: String
///           └── exporter: ExportFileType
///               ├── CSVNodes
///               └── CSVEdges
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Plan {
    #[serde(default)]
    pub meta: Option<PlanMeta>,
    pub layers: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub kegg: KeggConfig,
    #[serde(default)]
    pub export: ExportProfile,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            meta: Some(PlanMeta {
                name: Some("transomic 3D network".to_string()),
            }),
            layers: "layers.tsv".to_string(),
            data_dir: default_data_dir(),
            service: ServiceConfig::default(),
            kegg: KeggConfig::default(),
            export: ExportProfile {
                profiles: vec![
                    ExportProfileItem {
                        filename: "layeredNodes.csv".to_string(),
                        exporter: ExportFileType::CSVNodes,
                    },
                    ExportProfileItem {
                        filename: "layeredEdges.csv".to_string(),
                        exporter: ExportFileType::CSVEdges,
                    },
                ],
            },
        }
    }
}

impl Plan {
    pub fn network_name(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or("transomic 3D network")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PlanMeta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_service_url")]
    pub base_url: String,
    #[serde(default = "default_renderer")]
    pub renderer: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_url(),
            renderer: default_renderer(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KeggConfig {
    #[serde(default = "default_kegg_url")]
    pub base_url: String,
}

impl Default for KeggConfig {
    fn default() -> Self {
        Self {
            base_url: default_kegg_url(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExportProfile {
    pub profiles: Vec<ExportProfileItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ExportFileType {
    CSVNodes,
    CSVEdges,
}

fn default_data_dir() -> String {
    "pathways".to_string()
}

fn default_service_url() -> String {
    "http://localhost:1234".to_string()
}

fn default_renderer() -> String {
    "Cy3D".to_string()
}

fn default_kegg_url() -> String {
    "https://rest.kegg.jp".to_string()
}
