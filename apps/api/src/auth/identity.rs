// Caller identity resolution
// Production resolves bearer JWTs; development may install a fixed fixture user

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;
use uuid::Uuid;

use super::jwt::JwtKeys;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Invalid authorization format. Use: Bearer <token>")]
    MalformedCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Resolves the user a request acts for
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, headers: &HeaderMap) -> Result<Uuid, IdentityError>;
}

/// Identity from an `Authorization: Bearer <jwt>` header
pub struct JwtIdentity {
    keys: JwtKeys,
}

impl JwtIdentity {
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self {
            keys: JwtKeys::new(secret.as_ref()),
        }
    }
}

impl IdentityProvider for JwtIdentity {
    fn identify(&self, headers: &HeaderMap) -> Result<Uuid, IdentityError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(IdentityError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(IdentityError::MalformedCredentials)?;

        let claims = self.keys.verify(token).map_err(IdentityError::InvalidToken)?;

        Ok(claims.sub)
    }
}

/// Every request acts as the same user
///
/// Only installed when the app runs in development; see
/// [`AppConfig::identity_provider`](crate::config::AppConfig::identity_provider).
pub struct FixtureIdentity {
    user_id: Uuid,
}

impl FixtureIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

impl IdentityProvider for FixtureIdentity {
    fn identify(&self, _headers: &HeaderMap) -> Result<Uuid, IdentityError> {
        Ok(self.user_id)
    }
}
