// Settings persistence adapters
// JSON file for real runs, in-memory for tests

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::domain::settings::errors::{SettingsError, SettingsResult};
use crate::domain::settings::{PersistedSettings, SettingsPersistence};

/// Stores settings as a pretty-printed JSON file
///
/// A missing file loads as defaults. Writes go to a sibling temp file that is
/// then renamed over the target.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsPersistence for JsonFileSettingsStore {
    async fn load(&self) -> SettingsResult<PersistedSettings> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SettingsError::Persistence(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No settings file, using defaults");
                Ok(PersistedSettings::default())
            }
            Err(e) => Err(SettingsError::Persistence(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, settings: &PersistedSettings) -> SettingsResult<()> {
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| SettingsError::Persistence(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| SettingsError::Persistence(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SettingsError::Persistence(format!("{}: {}", self.path.display(), e)))?;

        Ok(())
    }
}

/// Keeps the last saved settings in memory
#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<PersistedSettings>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved settings
    pub async fn current(&self) -> PersistedSettings {
        self.settings.read().await.clone()
    }
}

#[async_trait]
impl SettingsPersistence for InMemorySettingsStore {
    async fn load(&self) -> SettingsResult<PersistedSettings> {
        Ok(self.current().await)
    }

    async fn save(&self, settings: &PersistedSettings) -> SettingsResult<()> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{Locale, ModelInfo, ProviderId};

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));

        assert_eq!(store.load().await.unwrap(), PersistedSettings::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileSettingsStore::new(&path);

        let mut settings = PersistedSettings {
            active_provider: ProviderId::OpenRouter,
            locale: Locale::En,
            ..Default::default()
        };
        settings.api_keys.insert(ProviderId::OpenRouter, "sk-or".to_string());
        settings.cached_models.insert(
            ProviderId::OpenRouter,
            vec![ModelInfo {
                id: "openai/gpt-4o".to_string(),
                name: "GPT-4o".to_string(),
                description: None,
            }],
        );
        store.save(&settings).await.unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let result = JsonFileSettingsStore::new(&path).load().await;
        assert!(matches!(result, Err(SettingsError::Persistence(_))));
    }

    #[tokio::test]
    async fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, br#"{"locale":"en"}"#).await.unwrap();

        let loaded = JsonFileSettingsStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.locale, Locale::En);
        assert_eq!(loaded.active_provider, ProviderId::Google);
    }
}
