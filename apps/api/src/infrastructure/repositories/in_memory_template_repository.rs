use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::TemplateRepository;
use crate::domain::template::Template;

/// Process-local TemplateRepository
///
/// Used when no database is configured in development, and by tests.
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<HashMap<Uuid, Template>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn insert(&self, template: &Template) -> Result<(), String> {
        let mut templates = self.templates.write().await;
        if templates.contains_key(&template.id()) {
            return Err(format!("duplicate template id: {}", template.id()));
        }
        templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn update(&self, template: &Template) -> Result<(), String> {
        let mut templates = self.templates.write().await;
        match templates.get_mut(&template.id()) {
            Some(existing) => {
                *existing = template.clone();
                Ok(())
            }
            None => Err(format!("Template not found: {}", template.id())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, String> {
        Ok(self.templates.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Template>, String> {
        let mut owned: Vec<Template> = self
            .templates
            .read()
            .await
            .values()
            .filter(|t| t.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(owned)
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        self.templates
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| format!("Template not found: {}", id))
    }
}
