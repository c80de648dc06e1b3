//! reqwest-backed client for a running clientgen web server.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{endpoints, Backend};
use crate::error::BackendError;
use crate::models::{Config, EngineStatus, StatsSnapshot};

/// HTTP client for the engine API.
///
/// No request timeout is set: start/stop wait for the server however long it
/// takes, and a hung stats fetch just overlaps the next one.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::transport(endpoint, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::transport(endpoint, e))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).trim().to_string();
            warn!(endpoint, status = status.as_u16(), %body, "request rejected");
            return Err(BackendError::Server {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "request ok");
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, BackendError> {
        let body = self
            .execute(endpoint, self.client.get(self.url(endpoint)))
            .await?;
        serde_json::from_slice(&body).map_err(|source| BackendError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn post_empty(&self, endpoint: &str) -> Result<(), BackendError> {
        self.execute(endpoint, self.client.post(self.url(endpoint)))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_config(&self) -> Result<Config, BackendError> {
        self.get_json(endpoints::CONFIG).await
    }

    async fn submit_config(&self, config: &Config) -> Result<(), BackendError> {
        let request = self.client.post(self.url(endpoints::CONFIG)).json(config);
        self.execute(endpoints::CONFIG, request).await.map(|_| ())
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, BackendError> {
        self.get_json(endpoints::STATS).await
    }

    async fn clear_stats(&self) -> Result<(), BackendError> {
        self.post_empty(endpoints::STATS_CLEAR).await
    }

    async fn start(&self) -> Result<(), BackendError> {
        self.post_empty(endpoints::START).await
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.post_empty(endpoints::STOP).await
    }

    async fn status(&self) -> Result<EngineStatus, BackendError> {
        self.get_json(endpoints::STATUS).await
    }
}
