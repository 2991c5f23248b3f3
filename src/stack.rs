use std::collections::HashSet;

use tracing::debug;

use crate::cytoscape::{self, NetworkService};
use crate::error::PipelineError;
use crate::layers::ImportedLayer;
use crate::table::{Table, Value};

/// Canonical node-identifier column of the stacked table.
pub const ID_COLUMN: &str = "id";
pub const Z_COLUMN: &str = "z";
pub const LAYER_INDEX_COLUMN: &str = "layer_index";
pub const SOURCE_COLUMN: &str = "source";
pub const TARGET_COLUMN: &str = "target";

/// Reads every layer's node table, stamps it with the layer's depth
/// coordinate and index, and unions all tables into one 3D node table.
///
/// No deduplication happens here: each import creates a fresh id namespace,
/// so node ids are disjoint across layers by construction (verified later).
pub async fn stack_nodes(
    service: &dyn NetworkService,
    layers: &[ImportedLayer],
) -> Result<Table, PipelineError> {
    let mut stacked = Table::new();
    for layer in layers {
        let mut table = service.node_table(layer.network).await?;
        table.add_constant_column(Z_COLUMN, Value::Number(layer.descriptor.z))?;
        table.add_constant_column(
            LAYER_INDEX_COLUMN,
            Value::Int(layer.descriptor.index as i64),
        )?;
        debug!(
            "Layer {}: {} nodes at z={}",
            layer.descriptor.index,
            table.len(),
            layer.descriptor.z
        );
        stacked.vstack(table);
    }
    // Promote the service-native identifier to the canonical id column.
    stacked.rename_column(cytoscape::NODE_ID_COLUMN, ID_COLUMN)?;
    Ok(stacked)
}

/// Reads every layer's edge table, resolves endpoints in one bulk call per
/// layer, stamps the layer index, and unions all tables row-wise.
pub async fn stack_edges(
    service: &dyn NetworkService,
    layers: &[ImportedLayer],
) -> Result<Table, PipelineError> {
    let mut stacked = Table::new();
    for layer in layers {
        let mut table = service.edge_table(layer.network).await?;
        if table.is_empty() {
            debug!("Layer {}: no edges", layer.descriptor.index);
            continue;
        }
        let endpoints: std::collections::HashMap<i64, (i64, i64)> = service
            .edge_endpoints(layer.network)
            .await?
            .into_iter()
            .map(|e| (e.edge.0, (e.source.0, e.target.0)))
            .collect();

        let mut sources = Vec::with_capacity(table.len());
        let mut targets = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let edge_id = table
                .get(row, cytoscape::EDGE_ID_COLUMN)
                .and_then(Value::as_i64)
                .ok_or_else(|| {
                    PipelineError::Inconsistency(format!(
                        "layer {} edge table row {} has no edge id",
                        layer.descriptor.index, row
                    ))
                })?;
            let (source, target) = endpoints.get(&edge_id).ok_or_else(|| {
                PipelineError::Inconsistency(format!(
                    "layer {} edge {} missing from endpoint resolution",
                    layer.descriptor.index, edge_id
                ))
            })?;
            sources.push(Value::Int(*source));
            targets.push(Value::Int(*target));
        }
        table.add_column(SOURCE_COLUMN, sources)?;
        table.add_column(TARGET_COLUMN, targets)?;
        table.add_constant_column(
            LAYER_INDEX_COLUMN,
            Value::Int(layer.descriptor.index as i64),
        )?;
        // The per-layer edge id references a namespace that dies with the
        // layer network; it has no meaning in the assembled table.
        table.drop_column(cytoscape::EDGE_ID_COLUMN);
        debug!("Layer {}: {} edges", layer.descriptor.index, table.len());
        stacked.vstack(table);
    }
    Ok(stacked)
}

/// Fail-fast integrity checks on the stacked tables: the id column must be
/// duplicate-free and every edge endpoint must reference a stacked node.
pub fn verify_stack(nodes: &Table, edges: &Table) -> Result<(), PipelineError> {
    let ids = nodes.column(ID_COLUMN).ok_or_else(|| {
        PipelineError::Inconsistency("stacked node table has no id column".to_string())
    })?;

    let mut seen: HashSet<String> = HashSet::with_capacity(ids.len());
    let mut duplicates = Vec::new();
    for id in ids {
        let id = id.to_text();
        if !seen.insert(id.clone()) {
            duplicates.push(id);
        }
    }
    if !duplicates.is_empty() {
        return Err(PipelineError::Inconsistency(format!(
            "duplicate node ids across layers: {:?}",
            duplicates
        )));
    }

    if edges.is_empty() {
        return Ok(());
    }
    let mut dangling = Vec::new();
    for column in [SOURCE_COLUMN, TARGET_COLUMN] {
        let endpoints = edges.column(column).ok_or_else(|| {
            PipelineError::Inconsistency(format!(
                "stacked edge table has no {} column",
                column
            ))
        })?;
        for (row, endpoint) in endpoints.iter().enumerate() {
            let endpoint = endpoint.to_text();
            if !seen.contains(&endpoint) {
                let layer = edges
                    .get(row, LAYER_INDEX_COLUMN)
                    .map(Value::to_text)
                    .unwrap_or_default();
                dangling.push(format!("{} {} (layer {})", column, endpoint, layer));
            }
        }
    }
    if !dangling.is_empty() {
        return Err(PipelineError::Inconsistency(format!(
            "edge endpoints missing from the stacked node table: {:?}",
            dangling
        )));
    }
    Ok(())
}
