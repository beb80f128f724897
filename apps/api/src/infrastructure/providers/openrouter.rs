// OpenRouter model listing: GET {base}/models with a bearer token

use serde::Deserialize;

use super::error_body::{transport_error, upstream_error};
use crate::domain::settings::provider::OPENROUTER;
use crate::domain::settings::{ModelInfo, UpstreamError};

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    data: Vec<OpenRouterModel>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterModel {
    id: String,
    name: Option<String>,
    description: Option<String>,
}

impl From<OpenRouterModel> for ModelInfo {
    fn from(m: OpenRouterModel) -> Self {
        Self {
            name: m.name.unwrap_or_else(|| m.id.clone()),
            id: m.id,
            description: m.description,
        }
    }
}

pub async fn list_models(
    client: &reqwest::Client,
    api_key: &str,
    base_url: &str,
) -> Result<Vec<ModelInfo>, UpstreamError> {
    let url = format!("{}{}", base_url, OPENROUTER.models_endpoint);
    let response = client
        .get(&url)
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(transport_error)?;

    if !response.status().is_success() {
        return Err(upstream_error(response).await);
    }

    let body: ListModelsResponse = response.json().await.map_err(transport_error)?;
    Ok(body.data.into_iter().map(ModelInfo::from).collect())
}
