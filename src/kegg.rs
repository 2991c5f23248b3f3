use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::PipelineError;

/// Source of pathway-markup documents, keyed by pathway identifier.
#[async_trait]
pub trait PathwaySource: Send + Sync {
    async fn fetch_pathway(&self, pathway: &str) -> Result<String, PipelineError>;
}

/// KEGG REST client. `GET {base}/get/{pathway}/kgml` returns the KGML
/// document for a pathway identifier.
pub struct KeggClient {
    base_url: String,
    http: Client,
}

impl KeggClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PathwaySource for KeggClient {
    async fn fetch_pathway(&self, pathway: &str) -> Result<String, PipelineError> {
        let url = format!("{}/get/{}/kgml", self.base_url, pathway);
        debug!("GET {}", url);
        let fetch_error = |reason: String| PipelineError::PathwayFetch {
            pathway: pathway.to_string(),
            reason,
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!(
                "pathway database returned status {}",
                response.status()
            )));
        }
        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }
}
