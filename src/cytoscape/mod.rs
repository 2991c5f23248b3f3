pub mod apps;
pub mod payload;
pub mod rest;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::Table;

pub use apps::ensure_required_apps;
pub use rest::CyRestClient;

/// Column under which the service reports its native node identifier.
pub const NODE_ID_COLUMN: &str = "SUID";
/// Column under which the service reports its native edge identifier.
pub const EDGE_ID_COLUMN: &str = "SUID";
/// Key column used when loading data onto nodes created by name.
pub const NAME_COLUMN: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved endpoints of one edge, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoints {
    pub edge: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// One edge to create in a bulk submission.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePair {
    pub source: NodeId,
    pub target: NodeId,
    pub interaction: Option<String>,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("malformed service response: {0}")]
    Malformed(String),
}

/// The visualization service, as an explicit handle. Every pipeline step
/// takes one of these; there is no ambient current-network state.
#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Imports a pathway document previously written to `file` and returns
    /// the handle of the created network.
    async fn import_network(&self, file: &Path) -> Result<NetworkId, ServiceError>;

    /// Node table of a network: native id column plus name and the planar
    /// x/y position assigned by the pathway layout.
    async fn node_table(&self, network: NetworkId) -> Result<Table, ServiceError>;

    /// Edge table of a network: native id column plus carried attributes
    /// such as interaction.
    async fn edge_table(&self, network: NetworkId) -> Result<Table, ServiceError>;

    /// Source/target resolution for every edge of the network in one call.
    /// Endpoint resolution is slow on the service side; issue this once per
    /// layer, never per edge.
    async fn edge_endpoints(&self, network: NetworkId) -> Result<Vec<EdgeEndpoints>, ServiceError>;

    /// Creates one node per name and returns their ids, aligned with the
    /// input order.
    async fn add_nodes(&self, network: NetworkId, names: &[String])
        -> Result<Vec<NodeId>, ServiceError>;

    /// Loads row data onto existing nodes, matched on `key_column`.
    async fn load_node_data(
        &self,
        network: NetworkId,
        data: &Table,
        key_column: &str,
    ) -> Result<(), ServiceError>;

    /// Re-applies the positional style mapping so freshly loaded coordinates
    /// take effect in the view.
    async fn apply_position_mapping(&self, network: NetworkId) -> Result<(), ServiceError>;

    /// Bulk edge creation; returns the created edge ids in input order.
    async fn add_edges(
        &self,
        network: NetworkId,
        edges: &[EdgePair],
    ) -> Result<Vec<EdgeId>, ServiceError>;

    /// Deletes exactly the given edges.
    async fn delete_edges(&self, network: NetworkId, edges: &[EdgeId]) -> Result<(), ServiceError>;

    /// Materializes a network from node/edge tables. Both tables are
    /// stringified at this boundary; the edge table may be empty.
    async fn create_network(
        &self,
        nodes: &Table,
        edges: &Table,
        name: &str,
    ) -> Result<NetworkId, ServiceError>;

    /// Switches the active rendering mode.
    async fn set_renderer(&self, renderer: &str) -> Result<(), ServiceError>;

    async fn installed_apps(&self) -> Result<Vec<String>, ServiceError>;

    async fn install_app(&self, name: &str) -> Result<(), ServiceError>;
}
