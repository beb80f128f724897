use std::sync::Arc;

use crate::auth::identity::IdentityProvider;
use crate::domain::repositories::TemplateRepository;
use crate::domain::settings::SettingsService;
use crate::domain::template::{DraftStore, TemplateGateway};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub templates: TemplateGateway,
    pub drafts: Arc<DraftStore>,
    pub settings: Arc<SettingsService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn TemplateRepository>,
        settings: Arc<SettingsService>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            templates: TemplateGateway::new(repository),
            drafts: Arc::new(DraftStore::new()),
            settings,
            identity,
        }
    }
}
