use thiserror::Error;

/// Errors surfaced by the template gateway
///
/// `NotFound` covers both a missing template and one owned by another user;
/// callers cannot tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Prompt not found or unauthorized")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unexpected(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;
