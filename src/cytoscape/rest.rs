//! REST implementation of [`NetworkService`] against the visualization
//! service's HTTP command API.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value as Json};
use tracing::debug;

use crate::table::Table;

use super::payload;
use super::{EdgeEndpoints, EdgeId, EdgePair, NetworkId, NetworkService, NodeId, ServiceError};

pub struct CyRestClient {
    base_url: String,
    http: Client,
}

impl CyRestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/v1/{}", self.base_url, endpoint)
    }

    async fn get_json(&self, endpoint: &str) -> Result<Json, ServiceError> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        Self::check_status(&response, endpoint)?;
        Ok(response.json().await?)
    }

    async fn post_json(&self, endpoint: &str, body: &Json) -> Result<Json, ServiceError> {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::check_status(&response, endpoint)?;
        Ok(response.json().await?)
    }

    async fn put_json(&self, endpoint: &str, body: &Json) -> Result<(), ServiceError> {
        let url = self.url(endpoint);
        debug!("PUT {}", url);
        let response = self.http.put(&url).json(body).send().await?;
        Self::check_status(&response, endpoint)?;
        Ok(())
    }

    fn check_status(response: &Response, endpoint: &str) -> Result<(), ServiceError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            })
        }
    }

    fn as_array<'a>(value: &'a Json, context: &str) -> Result<&'a Vec<Json>, ServiceError> {
        value
            .as_array()
            .ok_or_else(|| ServiceError::Malformed(format!("expected array in {}", context)))
    }
}

#[async_trait]
impl NetworkService for CyRestClient {
    async fn import_network(&self, file: &Path) -> Result<NetworkId, ServiceError> {
        let body = json!({ "file": file.to_string_lossy() });
        let response = self.post_json("commands/network/load", &body).await?;
        let networks = response
            .get("data")
            .and_then(|d| d.get("networks"))
            .and_then(Json::as_array)
            .ok_or_else(|| {
                ServiceError::Malformed("network load reply carries no network list".to_string())
            })?;
        let suid = networks
            .first()
            .and_then(Json::as_i64)
            .ok_or_else(|| ServiceError::Malformed("network load created nothing".to_string()))?;
        Ok(NetworkId(suid))
    }

    async fn node_table(&self, network: NetworkId) -> Result<Table, ServiceError> {
        let reply = self
            .get_json(&format!("networks/{}/tables/defaultnode", network.0))
            .await?;
        let rows = reply
            .get("rows")
            .ok_or_else(|| ServiceError::Malformed("node table reply has no rows".to_string()))?;
        let mut table = payload::rows_to_table(Self::as_array(rows, "node table rows")?)?;

        // Positions live in the view, not the table; merge them in by SUID.
        let views = self
            .get_json(&format!("networks/{}/views/first", network.0))
            .await?;
        let node_views = views
            .pointer("/elements/nodes")
            .and_then(Json::as_array)
            .cloned()
            .unwrap_or_default();
        let mut xs = vec![crate::table::Value::Null; table.len()];
        let mut ys = vec![crate::table::Value::Null; table.len()];
        for view in &node_views {
            let suid = payload::require_i64(view.get("data").unwrap_or(&Json::Null), "SUID")?;
            let x = view.pointer("/position/x").and_then(Json::as_f64);
            let y = view.pointer("/position/y").and_then(Json::as_f64);
            if let Some(row) = (0..table.len()).find(|&row| {
                table.get(row, super::NODE_ID_COLUMN).and_then(|v| v.as_i64()) == Some(suid)
            }) {
                if let Some(x) = x {
                    xs[row] = crate::table::Value::Number(x);
                }
                if let Some(y) = y {
                    ys[row] = crate::table::Value::Number(y);
                }
            }
        }
        table
            .add_column("x", xs)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        table
            .add_column("y", ys)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        Ok(table)
    }

    async fn edge_table(&self, network: NetworkId) -> Result<Table, ServiceError> {
        let reply = self
            .get_json(&format!("networks/{}/tables/defaultedge", network.0))
            .await?;
        let rows = reply
            .get("rows")
            .ok_or_else(|| ServiceError::Malformed("edge table reply has no rows".to_string()))?;
        payload::rows_to_table(Self::as_array(rows, "edge table rows")?)
    }

    async fn edge_endpoints(&self, network: NetworkId) -> Result<Vec<EdgeEndpoints>, ServiceError> {
        // One bulk request per network; per-edge lookups are documented as
        // slow on the service side.
        let reply = self
            .get_json(&format!("networks/{}/edges?format=full", network.0))
            .await?;
        let mut endpoints = Vec::new();
        for element in Self::as_array(&reply, "edge list")? {
            let data = element.get("data").unwrap_or(&Json::Null);
            endpoints.push(EdgeEndpoints {
                edge: EdgeId(payload::require_i64(data, "SUID")?),
                source: NodeId(payload::require_i64(data, "source")?),
                target: NodeId(payload::require_i64(data, "target")?),
            });
        }
        Ok(endpoints)
    }

    async fn add_nodes(
        &self,
        network: NetworkId,
        names: &[String],
    ) -> Result<Vec<NodeId>, ServiceError> {
        let body = Json::Array(names.iter().map(|n| json!(n)).collect());
        let reply = self
            .post_json(&format!("networks/{}/nodes", network.0), &body)
            .await?;
        let mut ids = Vec::with_capacity(names.len());
        for created in Self::as_array(&reply, "created nodes")? {
            ids.push(NodeId(payload::require_i64(created, "SUID")?));
        }
        Ok(ids)
    }

    async fn load_node_data(
        &self,
        network: NetworkId,
        data: &Table,
        key_column: &str,
    ) -> Result<(), ServiceError> {
        let body = json!({
            "key": key_column,
            "dataKey": key_column,
            "data": payload::table_to_rows(data),
        });
        self.put_json(&format!("networks/{}/tables/defaultnode", network.0), &body)
            .await
    }

    async fn apply_position_mapping(&self, network: NetworkId) -> Result<(), ServiceError> {
        self.get_json(&format!("apply/styles/default/{}", network.0))
            .await?;
        Ok(())
    }

    async fn add_edges(
        &self,
        network: NetworkId,
        edges: &[EdgePair],
    ) -> Result<Vec<EdgeId>, ServiceError> {
        let body = Json::Array(
            edges
                .iter()
                .map(|edge| {
                    json!({
                        "source": edge.source.0,
                        "target": edge.target.0,
                        "interaction": edge.interaction.clone().unwrap_or_default(),
                    })
                })
                .collect(),
        );
        let reply = self
            .post_json(&format!("networks/{}/edges", network.0), &body)
            .await?;
        let mut ids = Vec::with_capacity(edges.len());
        for created in Self::as_array(&reply, "created edges")? {
            ids.push(EdgeId(payload::require_i64(created, "SUID")?));
        }
        Ok(ids)
    }

    async fn delete_edges(&self, network: NetworkId, edges: &[EdgeId]) -> Result<(), ServiceError> {
        for edge in edges {
            let endpoint = format!("networks/{}/edges/{}", network.0, edge.0);
            let url = self.url(&endpoint);
            debug!("DELETE {}", url);
            let response = self.http.delete(&url).send().await?;
            Self::check_status(&response, &endpoint)?;
        }
        Ok(())
    }

    async fn create_network(
        &self,
        nodes: &Table,
        edges: &Table,
        name: &str,
    ) -> Result<NetworkId, ServiceError> {
        let node_elements: Vec<Json> = payload::table_to_rows(nodes)
            .into_iter()
            .map(|data| json!({ "data": data }))
            .collect();
        let edge_elements: Vec<Json> = payload::table_to_rows(edges)
            .into_iter()
            .map(|data| json!({ "data": data }))
            .collect();
        let body = json!({
            "data": { "name": name },
            "elements": { "nodes": node_elements, "edges": edge_elements },
        });
        let reply = self.post_json("networks", &body).await?;
        Ok(NetworkId(payload::require_i64(&reply, "networkSUID")?))
    }

    async fn set_renderer(&self, renderer: &str) -> Result<(), ServiceError> {
        let body = json!({ "renderer": renderer });
        self.post_json("commands/view/set-renderer", &body).await?;
        Ok(())
    }

    async fn installed_apps(&self) -> Result<Vec<String>, ServiceError> {
        let reply = self.get_json("apps/installed").await?;
        let mut names = Vec::new();
        for app in Self::as_array(&reply, "installed apps")? {
            let name = app
                .get("appName")
                .and_then(Json::as_str)
                .ok_or_else(|| ServiceError::Malformed("app entry has no appName".to_string()))?;
            names.push(name.to_string());
        }
        Ok(names)
    }

    async fn install_app(&self, name: &str) -> Result<(), ServiceError> {
        let body = json!({ "appName": name });
        self.post_json("apps/install", &body).await?;
        Ok(())
    }
}
