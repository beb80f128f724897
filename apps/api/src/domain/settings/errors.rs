use thiserror::Error;

use super::provider::ProviderId;

/// Failure talking to a provider's model-listing API
///
/// The message is the upstream's own error text when it could be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub message: String,
}

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from the provider settings service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Please enter an API Key first")]
    MissingApiKey(ProviderId),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Models are already being loaded")]
    RefreshInFlight,

    #[error("Failed to persist settings: {0}")]
    Persistence(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
