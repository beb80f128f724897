// Model-listing adapters for the supported providers

mod error_body;
pub mod google;
pub mod http_client;
pub mod openrouter;

pub use http_client::build_http_client;

use async_trait::async_trait;

use crate::domain::settings::{ModelCatalog, ModelInfo, ProviderId, UpstreamError};

/// ModelCatalog backed by the providers' HTTP APIs
#[derive(Clone)]
pub struct HttpModelCatalog {
    client: reqwest::Client,
}

impl HttpModelCatalog {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelCatalog for HttpModelCatalog {
    async fn list_models(
        &self,
        provider: ProviderId,
        api_key: &str,
        base_url: &str,
    ) -> Result<Vec<ModelInfo>, UpstreamError> {
        if api_key.is_empty() {
            return Err(UpstreamError::new("API Key is required"));
        }
        let base_url = base_url.trim_end_matches('/');

        match provider {
            ProviderId::Google => google::list_models(&self.client, api_key, base_url).await,
            ProviderId::OpenRouter => openrouter::list_models(&self.client, api_key, base_url).await,
        }
    }
}
