use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::repositories::TemplateRepository;
use crate::domain::template::Template;

/// PostgreSQL implementation of TemplateRepository
///
/// Templates live in `prompt_templates`; variable overrides are a JSONB
/// object. Schema is in `migrations/`.
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    /// Creates a new PostgresTemplateRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    content: String,
    description: Option<String>,
    variables: Json<BTreeMap<String, String>>,
    tags: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(r: TemplateRow) -> Self {
        Template::from_persistence(
            r.id,
            r.owner_id,
            r.title,
            r.content,
            r.description,
            r.variables.0,
            r.tags,
            r.created_at,
            r.updated_at,
        )
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, title, content, description, variables, tags, created_at, updated_at
    FROM prompt_templates
"#;

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn insert(&self, template: &Template) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO prompt_templates (
                id, owner_id, title, content, description,
                variables, tags, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(template.id())
        .bind(template.owner_id())
        .bind(template.title())
        .bind(template.content())
        .bind(template.description())
        .bind(Json(template.variables()))
        .bind(template.tags())
        .bind(template.created_at())
        .bind(template.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to insert template: {}", e))?;

        Ok(())
    }

    async fn update(&self, template: &Template) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE prompt_templates SET
                title = $2,
                content = $3,
                description = $4,
                variables = $5,
                tags = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(template.id())
        .bind(template.title())
        .bind(template.content())
        .bind(template.description())
        .bind(Json(template.variables()))
        .bind(template.tags())
        .bind(template.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update template: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Template not found: {}", template.id()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, String> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find template by id: {}", e))?;

        Ok(row.map(Template::from))
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Template>, String> {
        let rows = sqlx::query_as::<_, TemplateRow>(&format!(
            "{} WHERE owner_id = $1 ORDER BY updated_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find templates by owner: {}", e))?;

        Ok(rows.into_iter().map(Template::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM prompt_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete template: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Template not found: {}", id));
        }

        Ok(())
    }
}
