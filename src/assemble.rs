use tracing::info;

use crate::cytoscape::{NetworkId, NetworkService};
use crate::error::PipelineError;
use crate::table::Table;

/// Materializes the stacked tables as one network inside the service and
/// switches the active rendering mode to the 3D-capable renderer.
///
/// The service only accepts text, so both tables are stringified at the
/// client boundary on submission. An empty edge table yields a nodes-only
/// network.
pub async fn assemble_network(
    service: &dyn NetworkService,
    nodes: &Table,
    edges: &Table,
    name: &str,
    renderer: &str,
) -> Result<NetworkId, PipelineError> {
    info!(
        "Assembling network '{}' from {} nodes and {} edges",
        name,
        nodes.len(),
        edges.len()
    );
    let network = service.create_network(nodes, edges, name).await?;
    service.set_renderer(renderer).await?;
    info!("Network {} assembled, renderer set to {}", network, renderer);
    Ok(network)
}
