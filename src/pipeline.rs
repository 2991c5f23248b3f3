use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::assemble;
use crate::common;
use crate::cytoscape::{ensure_required_apps, CyRestClient, NetworkService};
use crate::export;
use crate::kegg::{KeggClient, PathwaySource};
use crate::layers::{self, ImportedLayer, LayerDescriptor};
use crate::midpoint;
use crate::plan::{ExportFileType, Plan};
use crate::stack;

/// Reads a plan file and runs the full pipeline against the live service
/// and pathway database configured in it.
pub async fn execute_plan(plan: String) -> Result<()> {
    info!("Executing plan {}", plan);

    let plan_file_path = Path::new(&plan);
    let path_content = fs::read_to_string(plan_file_path)?;
    let plan: Plan = serde_yaml::from_str(&path_content)?;
    debug!("Executing plan: {:?}", plan);

    let service = CyRestClient::new(&plan.service.base_url);
    let source = KeggClient::new(&plan.kegg.base_url);
    run_plan(&plan, plan_file_path, &service, &source).await
}

/// Runs one pipeline pass: import every layer, stack nodes and edges, verify,
/// assemble the 3D network, write exports. Service and pathway source are
/// explicit handles so runs can be driven against fakes.
pub async fn run_plan(
    plan: &Plan,
    plan_file_path: &Path,
    service: &dyn NetworkService,
    source: &dyn PathwaySource,
) -> Result<()> {
    let parent_dir = plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))?;

    let layers_path = parent_dir.join(&plan.layers);
    let descriptors = layers::load_layers(&layers_path)?;
    if descriptors.is_empty() {
        anyhow::bail!("Layer file {} contains no layers", layers_path.display());
    }
    info!("Loaded {} layer descriptors", descriptors.len());

    ensure_required_apps(service).await?;

    let data_dir = parent_dir.join(&plan.data_dir);
    fs::create_dir_all(&data_dir)?;

    let mut imported = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        imported.push(import_layer(service, source, &data_dir, descriptor).await?);
    }

    let nodes = stack::stack_nodes(service, &imported).await?;
    let edges = stack::stack_edges(service, &imported).await?;
    stack::verify_stack(&nodes, &edges)?;
    info!(
        "Stacked tables: {} nodes, {} edges across {} layers",
        nodes.len(),
        edges.len(),
        imported.len()
    );

    let network = assemble::assemble_network(
        service,
        &nodes,
        &edges,
        plan.network_name(),
        &plan.service.renderer,
    )
    .await?;
    info!("Assembled 3D network {}", network);

    for profile in &plan.export.profiles {
        info!(
            "Exporting file: {} using exporter {:?}",
            profile.filename, profile.exporter
        );
        let output = match profile.exporter {
            ExportFileType::CSVNodes => export::to_csv_nodes::render(&nodes),
            ExportFileType::CSVEdges => export::to_csv_edges::render(&edges),
        }
        .map_err(|e| anyhow!("Failed to render {}: {}", profile.filename, e))?;
        common::write_string_to_file(&parent_dir.join(&profile.filename), &output)?;
    }

    Ok(())
}

/// Fetches one layer's pathway document, persists it next to the plan, and
/// imports it into the service. When the descriptor asks for it, the fresh
/// network's edges are midpoint-split right after import.
async fn import_layer(
    service: &dyn NetworkService,
    source: &dyn PathwaySource,
    data_dir: &Path,
    descriptor: LayerDescriptor,
) -> Result<ImportedLayer> {
    info!(
        "Importing layer {} (pathway {})",
        descriptor.index, descriptor.pathway
    );
    let document = source.fetch_pathway(&descriptor.pathway).await?;
    let file = data_dir.join(format!("{}.xml", descriptor.pathway));
    common::write_string_to_file(&file, &document)?;

    let network = service.import_network(&file).await?;
    debug!("Layer {} imported as network {}", descriptor.index, network);

    let layer = ImportedLayer {
        descriptor,
        network,
    };
    if layer.descriptor.split {
        let outcome = midpoint::split_edges_at_midpoints(service, layer.network).await?;
        info!(
            "Layer {}: split {} edges into {}",
            layer.descriptor.index, outcome.original_edges, outcome.edges_added
        );
    }
    Ok(layer)
}
