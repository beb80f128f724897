use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::{SettingsError, SettingsResult};
use super::provider::{Locale, ModelInfo, ProviderId};

/// Settings that survive restarts
///
/// This is exactly what a [`SettingsPersistence`](super::SettingsPersistence)
/// implementation reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub active_provider: ProviderId,
    pub locale: Locale,
    pub api_keys: BTreeMap<ProviderId, String>,
    pub base_urls: BTreeMap<ProviderId, String>,
    pub selected_models: BTreeMap<ProviderId, String>,
    pub cached_models: BTreeMap<ProviderId, Vec<ModelInfo>>,
}

/// API keys provided through the environment, used when none is stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFallbacks {
    pub api_keys: BTreeMap<ProviderId, String>,
}

impl EnvFallbacks {
    pub fn with_api_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider, key.into());
        self
    }
}

/// Persisted settings plus per-process transient state
///
/// `is_loading_models` and `error` start cleared every run and are never
/// written by a persistence store.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    persisted: PersistedSettings,
    fallbacks: EnvFallbacks,
    is_loading_models: bool,
    error: Option<String>,
}

impl ProviderSettings {
    pub fn new(persisted: PersistedSettings, fallbacks: EnvFallbacks) -> Self {
        Self {
            persisted,
            fallbacks,
            is_loading_models: false,
            error: None,
        }
    }

    // ===== Writers =====

    pub fn set_active_provider(&mut self, provider: ProviderId) {
        self.persisted.active_provider = provider;
        self.error = None;
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.persisted.locale = locale;
    }

    pub fn set_api_key(&mut self, provider: ProviderId, key: impl Into<String>) {
        self.persisted.api_keys.insert(provider, key.into());
        self.error = None;
    }

    pub fn set_base_url(&mut self, provider: ProviderId, url: impl Into<String>) {
        self.persisted.base_urls.insert(provider, url.into());
    }

    pub fn set_selected_model(&mut self, provider: ProviderId, model: impl Into<String>) {
        self.persisted.selected_models.insert(provider, model.into());
    }

    pub fn set_cached_models(&mut self, provider: ProviderId, models: Vec<ModelInfo>) {
        self.persisted.cached_models.insert(provider, models);
    }

    pub fn set_loading_models(&mut self, loading: bool) {
        self.is_loading_models = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    // ===== Resolution =====

    /// Stored key, else the environment fallback
    pub fn api_key_for(&self, provider: ProviderId) -> Option<&str> {
        non_empty(self.persisted.api_keys.get(&provider))
            .or_else(|| non_empty(self.fallbacks.api_keys.get(&provider)))
    }

    /// Like [`api_key_for`](Self::api_key_for) but a missing key is an error
    pub fn require_api_key(&self, provider: ProviderId) -> SettingsResult<String> {
        self.api_key_for(provider)
            .map(str::to_string)
            .ok_or(SettingsError::MissingApiKey(provider))
    }

    /// Stored base URL override, else the provider default
    pub fn base_url_for(&self, provider: ProviderId) -> &str {
        non_empty(self.persisted.base_urls.get(&provider))
            .unwrap_or(provider.provider().default_base_url)
    }

    pub fn selected_model_for(&self, provider: ProviderId) -> Option<&str> {
        non_empty(self.persisted.selected_models.get(&provider))
    }

    pub fn models_for(&self, provider: ProviderId) -> &[ModelInfo] {
        self.persisted
            .cached_models
            .get(&provider)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn active_provider(&self) -> ProviderId {
        self.persisted.active_provider
    }

    pub fn active_api_key(&self) -> Option<&str> {
        self.api_key_for(self.active_provider())
    }

    pub fn active_base_url(&self) -> &str {
        self.base_url_for(self.active_provider())
    }

    pub fn active_selected_model(&self) -> Option<&str> {
        self.selected_model_for(self.active_provider())
    }

    pub fn active_models(&self) -> &[ModelInfo] {
        self.models_for(self.active_provider())
    }

    pub fn locale(&self) -> Locale {
        self.persisted.locale
    }

    pub fn is_loading_models(&self) -> bool {
        self.is_loading_models
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn persisted(&self) -> &PersistedSettings {
        &self.persisted
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}
