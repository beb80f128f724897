use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::template::Template;

/// Repository trait for Template aggregate
///
/// Storage only: ownership checks and validation live in the gateway.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert a new template
    async fn insert(&self, template: &Template) -> Result<(), String>;

    /// Overwrite an existing template
    async fn update(&self, template: &Template) -> Result<(), String>;

    /// Find a template by its ID, regardless of owner
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, String>;

    /// Find all templates of an owner, most recently updated first
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Template>, String>;

    /// Delete a template by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
