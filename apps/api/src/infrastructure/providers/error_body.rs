// Upstream error extraction shared by both providers

use reqwest::Response;
use serde::Deserialize;

use crate::domain::settings::UpstreamError;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Turns a non-success response into an [`UpstreamError`]
///
/// Uses `error.message` from the body when present, else the status code.
pub async fn upstream_error(response: Response) -> UpstreamError {
    let status = response.status();
    let message = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .filter(|m| !m.is_empty());

    UpstreamError::new(
        message.unwrap_or_else(|| format!("Failed to fetch models: {}", status.as_u16())),
    )
}

pub fn transport_error(e: reqwest::Error) -> UpstreamError {
    UpstreamError::new(format!("Failed to fetch models: {}", e))
}
