use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::CurrentUser;
use crate::api::state::AppState;
use crate::domain::template::variables::{estimate_tokens, extract_variables, render};
use crate::domain::template::{Template, TemplateFields, TemplatePatch, TemplateSettings};

/// Template as returned by the API
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub variable_names: Vec<String>,
    pub tags: Option<String>,
    pub settings: TemplateSettings,
    pub token_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Template> for TemplateResponse {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id(),
            title: template.title().to_string(),
            content: template.content().to_string(),
            description: template.description().map(str::to_string),
            variables: template.variables().clone(),
            variable_names: template.variable_names(),
            tags: template.tags().map(str::to_string),
            settings: template.settings(),
            token_count: estimate_tokens(template.content()),
            created_at: template.created_at(),
            updated_at: template.updated_at(),
        }
    }
}

/// Request body for previewing unsaved content
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub content: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Interpolated text plus the stats shown under the editor
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
    pub variables: Vec<String>,
    pub token_count: usize,
    pub character_count: usize,
}

/// Resolved prompt text, ready to copy
#[derive(Debug, Serialize)]
pub struct ResolvedResponse {
    pub text: String,
}

/// Render content with variable values
///
/// POST /api/preview
pub async fn preview(Json(req): Json<PreviewRequest>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        rendered: render(&req.content, &req.variables),
        variables: extract_variables(&req.content),
        token_count: estimate_tokens(&req.content),
        character_count: req.content.chars().count(),
    })
}

/// List the caller's templates, most recently updated first
///
/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<TemplateResponse>>, ApiError> {
    let templates = state.templates.list_by_owner(user_id).await?;

    Ok(Json(templates.iter().map(TemplateResponse::from).collect()))
}

/// Create a template
///
/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<TemplateFields>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let template = state.templates.create(user_id, req).await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(&template))))
}

/// Get a template by ID
///
/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = state
        .templates
        .get_by_id(user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Prompt not found"))?;

    Ok(Json(TemplateResponse::from(&template)))
}

/// Update some fields of a template
///
/// PATCH /api/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TemplatePatch>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = state.templates.update(user_id, id, req).await?;

    Ok(Json(TemplateResponse::from(&template)))
}

/// Delete a template
///
/// DELETE /api/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.templates.delete(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Template body with its stored variable values filled in
///
/// GET /api/templates/:id/resolved
pub async fn resolved_template(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResolvedResponse>, ApiError> {
    let template = state
        .templates
        .get_by_id(user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Prompt not found"))?;

    Ok(Json(ResolvedResponse {
        text: template.resolved(),
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
