use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::templates::TemplateResponse;
use crate::api::middleware::auth::CurrentUser;
use crate::api::state::AppState;
use crate::domain::template::value_objects::{OutputFormat, Role, Tone};
use crate::domain::template::{EditingSession, SessionState, TemplateFields};

/// Request body for opening a draft
#[derive(Debug, Default, Deserialize)]
pub struct OpenDraftRequest {
    /// Existing template to edit; omitted for a new, empty draft
    pub template_id: Option<Uuid>,
}

/// Edits to apply to a draft; omitted fields are left alone
///
/// `variables` entries are merged into the draft one by one.
#[derive(Debug, Default, Deserialize)]
pub struct EditDraftRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    pub tone: Option<Tone>,
    pub format: Option<OutputFormat>,
    pub role: Option<Role>,
    pub custom_role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscardQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Everything the editor shows for a draft
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub id: Uuid,
    pub state: SessionState,
    pub template_id: Option<Uuid>,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub draft: TemplateFields,
    pub detected_variables: Vec<String>,
    pub preview: String,
    pub token_count: usize,
    pub character_count: usize,
    pub error: Option<String>,
}

impl DraftResponse {
    fn new(id: Uuid, session: &EditingSession) -> Self {
        Self {
            id,
            state: session.state(),
            template_id: session.template_id(),
            is_dirty: session.is_dirty(),
            is_saving: session.is_saving(),
            draft: session.draft().clone(),
            detected_variables: session.detected_variables(),
            preview: session.preview(),
            token_count: session.token_count(),
            character_count: session.draft().content.chars().count(),
            error: session.last_error().map(str::to_string),
        }
    }
}

/// Result of saving a draft
#[derive(Debug, Serialize)]
pub struct SaveDraftResponse {
    pub template: TemplateResponse,
    pub draft: DraftResponse,
}

/// Open an editing session
///
/// POST /api/drafts
pub async fn open_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    body: Option<Json<OpenDraftRequest>>,
) -> Result<(StatusCode, Json<DraftResponse>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let session = match req.template_id {
        Some(template_id) => {
            let template = state
                .templates
                .get_by_id(user_id, template_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Prompt not found"))?;
            EditingSession::load(&template)
        }
        None => EditingSession::new(),
    };

    let id = state.drafts.open(user_id, session.clone()).await;

    Ok((StatusCode::CREATED, Json(DraftResponse::new(id, &session))))
}

/// Current state of a draft
///
/// GET /api/drafts/:id
pub async fn get_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftResponse>, ApiError> {
    let session = state.drafts.get(user_id, id).await?;

    Ok(Json(DraftResponse::new(id, &session)))
}

/// Apply edits to a draft
///
/// PATCH /api/drafts/:id
pub async fn edit_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EditDraftRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    let session = state
        .drafts
        .update(user_id, id, |session| {
            if let Some(title) = req.title {
                session.set_title(title);
            }
            if let Some(content) = req.content {
                session.set_content(content);
            }
            if let Some(description) = req.description {
                session.set_description(description);
            }
            for (name, value) in req.variables {
                session.set_variable(name, value);
            }
            if req.tone.is_some()
                || req.format.is_some()
                || req.role.is_some()
                || req.custom_role.is_some()
            {
                let mut settings = session.draft().settings.clone();
                if let Some(tone) = req.tone {
                    settings.tone = tone;
                }
                if let Some(format) = req.format {
                    settings.format = format;
                }
                if let Some(role) = req.role {
                    settings.role = role;
                }
                if let Some(custom_role) = req.custom_role {
                    settings.custom_role = custom_role;
                }
                session.set_settings(settings);
            }
            Ok(session.clone())
        })
        .await?;

    Ok(Json(DraftResponse::new(id, &session)))
}

/// Save a draft as a new or existing template
///
/// POST /api/drafts/:id/save
pub async fn save_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveDraftResponse>, ApiError> {
    let template = state.drafts.save(&state.templates, user_id, id).await?;
    let session = state.drafts.get(user_id, id).await?;

    Ok(Json(SaveDraftResponse {
        template: TemplateResponse::from(&template),
        draft: DraftResponse::new(id, &session),
    }))
}

/// Reset a draft to an empty one
///
/// POST /api/drafts/:id/discard?confirm=true
pub async fn discard_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DiscardQuery>,
) -> Result<Json<DraftResponse>, ApiError> {
    let session = state
        .drafts
        .update(user_id, id, |session| {
            session.discard(query.confirm)?;
            Ok(session.clone())
        })
        .await?;

    Ok(Json(DraftResponse::new(id, &session)))
}

/// Close a draft
///
/// DELETE /api/drafts/:id
pub async fn close_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.drafts.close(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
