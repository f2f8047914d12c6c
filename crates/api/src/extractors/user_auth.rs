//! Authenticated user extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::AuthenticatedUser;

/// Identity of the caller, as established by `require_user_auth`.
///
/// Rejects with 401 on routes the middleware does not guard.
#[derive(Debug, Clone)]
pub struct UserAuth(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(UserAuth)
            .ok_or_else(|| ApiError::Unauthorized("Unauthenticated.".to_string()))
    }
}
