// Persistence gateway for templates
// Every operation is scoped to the calling user; storage faults are logged
// and replaced by a fixed message so callers can show it inline.

use std::sync::Arc;
use uuid::Uuid;

use super::errors::{TemplateError, TemplateResult};
use super::template::{Template, TemplateFields, TemplatePatch};
use crate::domain::repositories::TemplateRepository;

/// Owner-scoped create/read/update/delete over a [`TemplateRepository`]
#[derive(Clone)]
pub struct TemplateGateway {
    repository: Arc<dyn TemplateRepository>,
}

impl TemplateGateway {
    pub fn new(repository: Arc<dyn TemplateRepository>) -> Self {
        Self { repository }
    }

    /// Creates a template owned by `owner_id`
    ///
    /// Blank content is rejected before the repository is touched.
    pub async fn create(&self, owner_id: Uuid, fields: TemplateFields) -> TemplateResult<Template> {
        let template = Template::new(owner_id, fields)?;

        self.repository.insert(&template).await.map_err(|e| {
            tracing::error!(owner_id = %owner_id, error = %e, "Failed to create prompt");
            TemplateError::Unexpected("Failed to create prompt".to_string())
        })?;

        tracing::info!(template_id = %template.id(), owner_id = %owner_id, "Prompt created");
        Ok(template)
    }

    /// Applies a partial update to a template owned by `owner_id`
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TemplatePatch,
    ) -> TemplateResult<Template> {
        let mut template = self.owned(owner_id, id, "Failed to update prompt").await?;
        template.apply(patch)?;

        self.repository.update(&template).await.map_err(|e| {
            tracing::error!(template_id = %id, error = %e, "Failed to update prompt");
            TemplateError::Unexpected("Failed to update prompt".to_string())
        })?;

        Ok(template)
    }

    /// Deletes a template owned by `owner_id`; other users' templates are left untouched
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> TemplateResult<()> {
        self.owned(owner_id, id, "Failed to delete prompt").await?;

        self.repository.delete(id).await.map_err(|e| {
            tracing::error!(template_id = %id, error = %e, "Failed to delete prompt");
            TemplateError::Unexpected("Failed to delete prompt".to_string())
        })?;

        tracing::info!(template_id = %id, owner_id = %owner_id, "Prompt deleted");
        Ok(())
    }

    /// All templates of `owner_id`, most recently updated first
    pub async fn list_by_owner(&self, owner_id: Uuid) -> TemplateResult<Vec<Template>> {
        let mut templates = self.repository.find_by_owner(owner_id).await.map_err(|e| {
            tracing::error!(owner_id = %owner_id, error = %e, "Failed to list prompts");
            TemplateError::Unexpected("Failed to load prompts".to_string())
        })?;
        templates.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));

        Ok(templates)
    }

    /// The template with `id` if it exists and belongs to `owner_id`
    pub async fn get_by_id(&self, owner_id: Uuid, id: Uuid) -> TemplateResult<Option<Template>> {
        let found = self.repository.find_by_id(id).await.map_err(|e| {
            tracing::error!(template_id = %id, error = %e, "Failed to load prompt");
            TemplateError::Unexpected("Failed to load prompt".to_string())
        })?;

        Ok(found.filter(|t| t.owner_id() == owner_id))
    }

    async fn owned(&self, owner_id: Uuid, id: Uuid, failure: &str) -> TemplateResult<Template> {
        let found = self.repository.find_by_id(id).await.map_err(|e| {
            tracing::error!(template_id = %id, error = %e, "{}", failure);
            TemplateError::Unexpected(failure.to_string())
        })?;

        match found {
            Some(template) if template.owner_id() == owner_id => Ok(template),
            _ => Err(TemplateError::NotFound),
        }
    }
}
