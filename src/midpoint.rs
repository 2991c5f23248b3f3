use std::collections::HashMap;

use tracing::{debug, info};

use crate::cytoscape::{
    EdgeId, EdgePair, NetworkId, NetworkService, NodeId, EDGE_ID_COLUMN, NAME_COLUMN,
    NODE_ID_COLUMN,
};
use crate::error::PipelineError;
use crate::table::{Table, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOutcome {
    pub original_edges: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
}

struct EdgeSpan {
    edge: EdgeId,
    source: NodeId,
    target: NodeId,
    interaction: Option<String>,
    mid_x: f64,
    mid_y: f64,
}

/// Bends every edge of a network in 3D space: inserts one synthetic node at
/// each edge's midpoint, rewires the edge into (source → midpoint) and
/// (midpoint → target), and removes the original edge.
///
/// Original edges are deleted only after both replacement batches are
/// confirmed created, so a failing creation step leaves the network intact.
pub async fn split_edges_at_midpoints(
    service: &dyn NetworkService,
    network: NetworkId,
) -> Result<SplitOutcome, PipelineError> {
    let nodes = service.node_table(network).await?;
    let edges = service.edge_table(network).await?;
    let endpoints = service.edge_endpoints(network).await?;
    if endpoints.is_empty() {
        debug!("Network {} has no edges to split", network);
        return Ok(SplitOutcome {
            original_edges: 0,
            nodes_added: 0,
            edges_added: 0,
        });
    }

    let positions = node_positions(&nodes)?;
    let interactions = edge_interactions(&edges);

    let mut spans = Vec::with_capacity(endpoints.len());
    for endpoint in &endpoints {
        let source = *positions.get(&endpoint.source.0).ok_or_else(|| {
            PipelineError::Inconsistency(format!(
                "edge {} source node {} has no position",
                endpoint.edge.0, endpoint.source.0
            ))
        })?;
        let target = *positions.get(&endpoint.target.0).ok_or_else(|| {
            PipelineError::Inconsistency(format!(
                "edge {} target node {} has no position",
                endpoint.edge.0, endpoint.target.0
            ))
        })?;
        let (mid_x, mid_y) = truncated_midpoint(source, target);
        spans.push(EdgeSpan {
            edge: endpoint.edge,
            source: endpoint.source,
            target: endpoint.target,
            interaction: interactions.get(&endpoint.edge.0).cloned(),
            mid_x,
            mid_y,
        });
    }

    // Midpoint nodes are named by the split edge's id so data and endpoint
    // joins below can address them by name.
    let names: Vec<String> = spans.iter().map(|s| s.edge.0.to_string()).collect();
    let created = service.add_nodes(network, &names).await?;
    if created.len() != names.len() {
        return Err(PipelineError::Inconsistency(format!(
            "requested {} midpoint nodes, service created {}",
            names.len(),
            created.len()
        )));
    }

    let mut data = Table::new();
    for span in &spans {
        data.push_row(vec![
            (NAME_COLUMN, Value::Text(span.edge.0.to_string())),
            ("x", Value::Number(span.mid_x)),
            ("y", Value::Number(span.mid_y)),
            (
                "interaction",
                span.interaction
                    .clone()
                    .map(Value::Text)
                    .unwrap_or(Value::Null),
            ),
        ]);
    }
    service.load_node_data(network, &data, NAME_COLUMN).await?;
    service.apply_position_mapping(network).await?;

    let first_half: Vec<EdgePair> = spans
        .iter()
        .zip(&created)
        .map(|(span, midpoint)| EdgePair {
            source: span.source,
            target: *midpoint,
            interaction: span.interaction.clone(),
        })
        .collect();
    let second_half: Vec<EdgePair> = spans
        .iter()
        .zip(&created)
        .map(|(span, midpoint)| EdgePair {
            source: *midpoint,
            target: span.target,
            interaction: span.interaction.clone(),
        })
        .collect();
    service.add_edges(network, &first_half).await?;
    service.add_edges(network, &second_half).await?;

    // Both halves exist now; removing the originals can no longer lose edges.
    let originals: Vec<EdgeId> = spans.iter().map(|s| s.edge).collect();
    service.delete_edges(network, &originals).await?;

    info!(
        "Split network {}: {} edges replaced by {} bent edges via {} midpoint nodes",
        network,
        spans.len(),
        spans.len() * 2,
        spans.len()
    );
    Ok(SplitOutcome {
        original_edges: spans.len(),
        nodes_added: spans.len(),
        edges_added: spans.len() * 2,
    })
}

fn node_positions(nodes: &Table) -> Result<HashMap<i64, (f64, f64)>, PipelineError> {
    let mut positions = HashMap::with_capacity(nodes.len());
    for row in 0..nodes.len() {
        let suid = nodes
            .get(row, NODE_ID_COLUMN)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                PipelineError::Inconsistency(format!("node table row {} has no id", row))
            })?;
        let x = nodes.get(row, "x").and_then(Value::as_f64);
        let y = nodes.get(row, "y").and_then(Value::as_f64);
        if let (Some(x), Some(y)) = (x, y) {
            positions.insert(suid, (x, y));
        }
    }
    Ok(positions)
}

fn edge_interactions(edges: &Table) -> HashMap<i64, String> {
    let mut interactions = HashMap::with_capacity(edges.len());
    for row in 0..edges.len() {
        let suid = edges.get(row, EDGE_ID_COLUMN).and_then(Value::as_i64);
        let interaction = edges.get(row, "interaction").and_then(|v| v.as_str());
        if let (Some(suid), Some(interaction)) = (suid, interaction) {
            interactions.insert(suid, interaction.to_string());
        }
    }
    interactions
}

/// Midpoint of two positions with both coordinates truncated to integers
/// before averaging. Truncation-before-average is observable in the numeric
/// output and must not be replaced by average-then-truncate.
fn truncated_midpoint(source: (f64, f64), target: (f64, f64)) -> (f64, f64) {
    let (sx, sy) = (source.0.trunc() as i64, source.1.trunc() as i64);
    let (tx, ty) = (target.0.trunc() as i64, target.1.trunc() as i64);
    (((sx + tx) as f64) / 2.0, ((sy + ty) as f64) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_of_integer_positions() {
        assert_eq!(truncated_midpoint((2.0, 4.0), (5.0, 7.0)), (3.5, 5.5));
    }

    #[test]
    fn truncates_before_averaging() {
        // Averaging first would give ((2.9+5.1)/2, (4.8+7.9)/2) = (4.0, 6.35).
        assert_eq!(truncated_midpoint((2.9, 4.8), (5.1, 7.9)), (3.5, 5.5));
    }

    #[test]
    fn truncation_is_toward_zero() {
        assert_eq!(truncated_midpoint((-2.9, 0.0), (5.0, 0.0)), (1.5, 0.0));
    }
}
