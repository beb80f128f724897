// Google AI model listing: GET {base}/models?key=<api key>

use serde::Deserialize;

use super::error_body::{transport_error, upstream_error};
use crate::domain::settings::provider::GOOGLE;
use crate::domain::settings::{ModelInfo, UpstreamError};

/// Only names containing this marker are offered
const MODEL_MARKER: &str = "gemini";
const NAME_PREFIX: &str = "models/";

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GoogleModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleModel {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
}

impl From<GoogleModel> for ModelInfo {
    fn from(m: GoogleModel) -> Self {
        let id = m.name.replacen(NAME_PREFIX, "", 1);
        Self {
            name: m.display_name.unwrap_or_else(|| id.clone()),
            id,
            description: m.description,
        }
    }
}

pub async fn list_models(
    client: &reqwest::Client,
    api_key: &str,
    base_url: &str,
) -> Result<Vec<ModelInfo>, UpstreamError> {
    let url = format!("{}{}", base_url, GOOGLE.models_endpoint);
    let response = client
        .get(&url)
        .query(&[("key", api_key)])
        .send()
        .await
        .map_err(transport_error)?;

    if !response.status().is_success() {
        return Err(upstream_error(response).await);
    }

    let body: ListModelsResponse = response.json().await.map_err(transport_error)?;
    Ok(body
        .models
        .into_iter()
        .filter(|m| m.name.contains(MODEL_MARKER))
        .map(ModelInfo::from)
        .collect())
}
