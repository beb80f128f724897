use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;

/// Authenticated caller for protected routes
///
/// Resolved through the [`IdentityProvider`](crate::auth::identity::IdentityProvider)
/// held in [`AppState`].
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user_id): CurrentUser,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let user_id = app.identity.identify(&parts.headers)?;

        Ok(CurrentUser(user_id))
    }
}
