use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::identity::IdentityError;
use crate::domain::settings::SettingsError;
use crate::domain::template::{DraftError, SessionError, TemplateError};

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 502 Bad Gateway error
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        Self::unauthorized(e.to_string())
    }
}

impl From<TemplateError> for ApiError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::Unauthorized => Self::unauthorized(e.to_string()),
            TemplateError::NotFound => Self::not_found(e.to_string()),
            TemplateError::Validation(message) => Self::bad_request(message),
            TemplateError::Unexpected(message) => Self::internal_server_error(message),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::EmptyContent | SessionError::NoChanges => Self::bad_request(e.to_string()),
            SessionError::SaveInFlight
            | SessionError::NoSaveInFlight
            | SessionError::ConfirmationRequired => Self::conflict(e.to_string()),
            SessionError::Gateway(inner) => inner.into(),
        }
    }
}

impl From<DraftError> for ApiError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::NotFound(_) => Self::not_found(e.to_string()),
            DraftError::Session(inner) => inner.into(),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::MissingApiKey(_) => Self::bad_request(e.to_string()),
            SettingsError::Upstream(inner) => Self::bad_gateway(inner.message),
            SettingsError::RefreshInFlight => Self::conflict(e.to_string()),
            SettingsError::Persistence(_) => Self::internal_server_error(e.to_string()),
        }
    }
}
