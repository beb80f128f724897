use async_trait::async_trait;

use super::errors::{SettingsResult, UpstreamError};
use super::provider::{ModelInfo, ProviderId};
use super::state::PersistedSettings;

/// Lists the models a provider offers
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(
        &self,
        provider: ProviderId,
        api_key: &str,
        base_url: &str,
    ) -> Result<Vec<ModelInfo>, UpstreamError>;
}

/// Durable storage for [`PersistedSettings`]
///
/// Loaded once on start, written after every change.
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    async fn load(&self) -> SettingsResult<PersistedSettings>;

    async fn save(&self, settings: &PersistedSettings) -> SettingsResult<()>;
}
