use thiserror::Error;

use crate::cytoscape::ServiceError;
use crate::table::TableError;

/// Failure classes of a pipeline run. Every variant aborts the run; nothing
/// is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The pathway database could not deliver a diagram for this identifier.
    #[error("failed to fetch pathway '{pathway}': {reason}")]
    PathwayFetch { pathway: String, reason: String },

    /// A visualization-service call failed. All later steps depend on service
    /// state, so the run cannot continue.
    #[error("visualization service call failed: {0}")]
    Service(#[from] ServiceError),

    /// The stacked tables violate an invariant (duplicate node id, edge
    /// endpoint missing from the node table).
    #[error("stacked tables are inconsistent: {0}")]
    Inconsistency(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
