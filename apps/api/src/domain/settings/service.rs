// Provider settings service
// Owns the settings state, writes it through the persistence port after
// every change and refreshes model lists through the catalog port.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::errors::{SettingsError, SettingsResult};
use super::ports::{ModelCatalog, SettingsPersistence};
use super::provider::{Locale, ModelInfo, ProviderId};
use super::state::{EnvFallbacks, ProviderSettings};

pub struct SettingsService {
    state: RwLock<ProviderSettings>,
    persistence: Arc<dyn SettingsPersistence>,
    catalog: Arc<dyn ModelCatalog>,
    loading: AtomicBool,
}

/// Holds the refresh slot; released on drop, including when the refreshing
/// future is cancelled mid-fetch
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SettingsService {
    /// Loads persisted settings and builds the service
    pub async fn load(
        persistence: Arc<dyn SettingsPersistence>,
        catalog: Arc<dyn ModelCatalog>,
        fallbacks: EnvFallbacks,
    ) -> SettingsResult<Self> {
        let persisted = persistence.load().await?;
        Ok(Self {
            state: RwLock::new(ProviderSettings::new(persisted, fallbacks)),
            persistence,
            catalog,
            loading: AtomicBool::new(false),
        })
    }

    /// Copy of the current settings
    pub async fn snapshot(&self) -> ProviderSettings {
        let settings = self.state.read().await.clone();
        self.with_loading_flag(settings)
    }

    pub async fn set_active_provider(&self, provider: ProviderId) -> SettingsResult<ProviderSettings> {
        self.mutate(|s| s.set_active_provider(provider)).await
    }

    pub async fn set_locale(&self, locale: Locale) -> SettingsResult<ProviderSettings> {
        self.mutate(|s| s.set_locale(locale)).await
    }

    /// Stores credentials for `provider`; `None` leaves a field unchanged
    pub async fn set_credentials(
        &self,
        provider: ProviderId,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> SettingsResult<ProviderSettings> {
        self.mutate(|s| {
            if let Some(key) = api_key {
                s.set_api_key(provider, key);
            }
            if let Some(url) = base_url {
                s.set_base_url(provider, url);
            }
        })
        .await
    }

    pub async fn set_selected_model(
        &self,
        provider: ProviderId,
        model_id: String,
    ) -> SettingsResult<ProviderSettings> {
        self.mutate(|s| s.set_selected_model(provider, model_id)).await
    }

    /// Fetches the model list of `provider` and caches it
    ///
    /// The first model is selected when none is. On failure the error text is
    /// stored in the settings and the cached list is left as it was.
    pub async fn refresh_models(&self, provider: ProviderId) -> SettingsResult<Vec<ModelInfo>> {
        let _loading = LoadingGuard::acquire(&self.loading).ok_or(SettingsError::RefreshInFlight)?;

        let (api_key, base_url) = {
            let mut state = self.state.write().await;
            let api_key = match state.require_api_key(provider) {
                Ok(key) => key,
                Err(e) => {
                    state.set_error(Some(e.to_string()));
                    return Err(e);
                }
            };
            state.set_error(None);
            (api_key, state.base_url_for(provider).to_string())
        };

        tracing::info!(provider = %provider, base_url = %base_url, "Fetching models");
        let fetched = self.catalog.list_models(provider, &api_key, &base_url).await;

        let mut state = self.state.write().await;
        match fetched {
            Ok(models) => {
                tracing::info!(provider = %provider, count = models.len(), "Models fetched");
                if state.selected_model_for(provider).is_none() {
                    if let Some(first) = models.first() {
                        state.set_selected_model(provider, first.id.clone());
                    }
                }
                state.set_cached_models(provider, models.clone());
                self.persistence.save(state.persisted()).await?;
                Ok(models)
            }
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "Failed to fetch models");
                state.set_error(Some(e.message.clone()));
                Err(e.into())
            }
        }
    }

    async fn mutate(&self, f: impl FnOnce(&mut ProviderSettings)) -> SettingsResult<ProviderSettings> {
        let mut state = self.state.write().await;
        f(&mut state);
        self.persistence.save(state.persisted()).await?;
        Ok(self.with_loading_flag(state.clone()))
    }

    fn with_loading_flag(&self, mut settings: ProviderSettings) -> ProviderSettings {
        settings.set_loading_models(self.loading.load(Ordering::Acquire));
        settings
    }
}
