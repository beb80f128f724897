// Provider settings domain module
// Provider table, persisted settings, and the ports used to store them and
// to list models

pub mod errors;
pub mod ports;
pub mod provider;
pub mod service;
pub mod state;

pub use errors::{SettingsError, UpstreamError};
pub use ports::{ModelCatalog, SettingsPersistence};
pub use provider::{Locale, ModelInfo, ProviderId};
pub use service::SettingsService;
pub use state::{EnvFallbacks, PersistedSettings, ProviderSettings};
