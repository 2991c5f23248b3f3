use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use stratomics::cytoscape::{
    EdgeEndpoints, EdgeId, EdgePair, NetworkId, NetworkService, NodeId, ServiceError,
};
use stratomics::error::PipelineError;
use stratomics::kegg::PathwaySource;
use stratomics::table::{Table, Value};

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub id: i64,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct FakeEdge {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    pub interaction: String,
}

#[derive(Debug, Clone, Default)]
pub struct FakeNetwork {
    pub nodes: Vec<FakeNode>,
    pub edges: Vec<FakeEdge>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    networks: HashMap<i64, FakeNetwork>,
    installed: Vec<String>,
    install_calls: Vec<String>,
    renderer: Option<String>,
    assembled: Vec<(String, Table, Table)>,
    position_mappings: Vec<i64>,
}

/// In-memory stand-in for the visualization service. Every imported layer
/// gets three nodes (with fractional positions, so coordinate truncation is
/// observable) and two edges.
pub struct FakeService {
    state: Mutex<State>,
}

const LAYOUT: [(f64, f64); 3] = [(2.9, 4.8), (5.1, 7.9), (8.0, 9.0)];

impl FakeService {
    pub fn new() -> Self {
        Self::with_installed_apps(&[])
    }

    pub fn with_installed_apps(apps: &[&str]) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                installed: apps.iter().map(|a| a.to_string()).collect(),
                ..State::default()
            }),
        }
    }

    pub fn network(&self, id: NetworkId) -> Option<FakeNetwork> {
        self.state.lock().unwrap().networks.get(&id.0).cloned()
    }

    pub fn network_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.state.lock().unwrap().networks.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn assembled(&self) -> Vec<(String, Table, Table)> {
        self.state.lock().unwrap().assembled.clone()
    }

    pub fn renderer(&self) -> Option<String> {
        self.state.lock().unwrap().renderer.clone()
    }

    pub fn install_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().install_calls.clone()
    }

    pub fn position_mapping_count(&self) -> usize {
        self.state.lock().unwrap().position_mappings.len()
    }
}

fn next_id(state: &mut State) -> i64 {
    let id = state.next_id;
    state.next_id += 1;
    id
}

#[async_trait]
impl NetworkService for FakeService {
    async fn import_network(&self, file: &Path) -> Result<NetworkId, ServiceError> {
        if !file.exists() {
            return Err(ServiceError::Malformed(format!(
                "no such pathway document: {}",
                file.display()
            )));
        }
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut state = self.state.lock().unwrap();
        let network_id = next_id(&mut state);
        let mut network = FakeNetwork::default();
        for (i, (x, y)) in LAYOUT.iter().enumerate() {
            let id = next_id(&mut state);
            network.nodes.push(FakeNode {
                id,
                name: format!("{}:n{}", stem, i),
                x: *x,
                y: *y,
            });
        }
        for window in 0..2 {
            let id = next_id(&mut state);
            network.edges.push(FakeEdge {
                id,
                source: network.nodes[window].id,
                target: network.nodes[window + 1].id,
                interaction: "pp".to_string(),
            });
        }
        state.networks.insert(network_id, network);
        Ok(NetworkId(network_id))
    }

    async fn node_table(&self, network: NetworkId) -> Result<Table, ServiceError> {
        let state = self.state.lock().unwrap();
        let net = state
            .networks
            .get(&network.0)
            .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
        let mut table = Table::new();
        for node in &net.nodes {
            table.push_row(vec![
                ("SUID", Value::Int(node.id)),
                ("name", Value::Text(node.name.clone())),
                ("x", Value::Number(node.x)),
                ("y", Value::Number(node.y)),
            ]);
        }
        Ok(table)
    }

    async fn edge_table(&self, network: NetworkId) -> Result<Table, ServiceError> {
        let state = self.state.lock().unwrap();
        let net = state
            .networks
            .get(&network.0)
            .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
        let mut table = Table::new();
        for edge in &net.edges {
            table.push_row(vec![
                ("SUID", Value::Int(edge.id)),
                ("interaction", Value::Text(edge.interaction.clone())),
            ]);
        }
        Ok(table)
    }

    async fn edge_endpoints(&self, network: NetworkId) -> Result<Vec<EdgeEndpoints>, ServiceError> {
        let state = self.state.lock().unwrap();
        let net = state
            .networks
            .get(&network.0)
            .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
        Ok(net
            .edges
            .iter()
            .map(|edge| EdgeEndpoints {
                edge: EdgeId(edge.id),
                source: NodeId(edge.source),
                target: NodeId(edge.target),
            })
            .collect())
    }

    async fn add_nodes(
        &self,
        network: NetworkId,
        names: &[String],
    ) -> Result<Vec<NodeId>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = next_id(&mut state);
            let net = state
                .networks
                .get_mut(&network.0)
                .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
            net.nodes.push(FakeNode {
                id,
                name: name.clone(),
                x: 0.0,
                y: 0.0,
            });
            ids.push(NodeId(id));
        }
        Ok(ids)
    }

    async fn load_node_data(
        &self,
        network: NetworkId,
        data: &Table,
        key_column: &str,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        let net = state
            .networks
            .get_mut(&network.0)
            .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
        for row in 0..data.len() {
            let key = data
                .get(row, key_column)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ServiceError::Malformed(format!("data row {} has no key '{}'", row, key_column))
                })?;
            let node = net
                .nodes
                .iter_mut()
                .find(|n| n.name == key)
                .ok_or_else(|| ServiceError::Malformed(format!("no node named '{}'", key)))?;
            if let Some(x) = data.get(row, "x").and_then(Value::as_f64) {
                node.x = x;
            }
            if let Some(y) = data.get(row, "y").and_then(Value::as_f64) {
                node.y = y;
            }
        }
        Ok(())
    }

    async fn apply_position_mapping(&self, network: NetworkId) -> Result<(), ServiceError> {
        self.state.lock().unwrap().position_mappings.push(network.0);
        Ok(())
    }

    async fn add_edges(
        &self,
        network: NetworkId,
        edges: &[EdgePair],
    ) -> Result<Vec<EdgeId>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let mut ids = Vec::with_capacity(edges.len());
        for pair in edges {
            let id = next_id(&mut state);
            let net = state
                .networks
                .get_mut(&network.0)
                .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
            net.edges.push(FakeEdge {
                id,
                source: pair.source.0,
                target: pair.target.0,
                interaction: pair.interaction.clone().unwrap_or_default(),
            });
            ids.push(EdgeId(id));
        }
        Ok(ids)
    }

    async fn delete_edges(&self, network: NetworkId, edges: &[EdgeId]) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        let net = state
            .networks
            .get_mut(&network.0)
            .ok_or_else(|| ServiceError::Malformed(format!("no network {}", network.0)))?;
        for edge in edges {
            let before = net.edges.len();
            net.edges.retain(|e| e.id != edge.0);
            if net.edges.len() == before {
                return Err(ServiceError::Malformed(format!("no edge {}", edge.0)));
            }
        }
        Ok(())
    }

    async fn create_network(
        &self,
        nodes: &Table,
        edges: &Table,
        name: &str,
    ) -> Result<NetworkId, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let network_id = next_id(&mut state);
        state.networks.insert(network_id, FakeNetwork::default());
        state
            .assembled
            .push((name.to_string(), nodes.clone(), edges.clone()));
        Ok(NetworkId(network_id))
    }

    async fn set_renderer(&self, renderer: &str) -> Result<(), ServiceError> {
        self.state.lock().unwrap().renderer = Some(renderer.to_string());
        Ok(())
    }

    async fn installed_apps(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.state.lock().unwrap().installed.clone())
    }

    async fn install_app(&self, name: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.installed.push(name.to_string());
        state.install_calls.push(name.to_string());
        Ok(())
    }
}

/// Pathway source returning a canned KGML document, optionally failing for
/// one identifier.
pub struct FakePathwaySource {
    pub fail_on: Option<String>,
}

impl FakePathwaySource {
    pub fn new() -> Self {
        Self { fail_on: None }
    }
}

#[async_trait]
impl PathwaySource for FakePathwaySource {
    async fn fetch_pathway(&self, pathway: &str) -> Result<String, PipelineError> {
        if self.fail_on.as_deref() == Some(pathway) {
            return Err(PipelineError::PathwayFetch {
                pathway: pathway.to_string(),
                reason: "pathway database returned status 404 Not Found".to_string(),
            });
        }
        Ok(format!("<pathway name=\"{}\"/>", pathway))
    }
}
