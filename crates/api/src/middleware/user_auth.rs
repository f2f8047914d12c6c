//! Bearer token authentication middleware.
//!
//! Tokens are opaque strings issued at login. Only their SHA-256 hash is
//! stored, so a lookup hashes the presented token and matches on the hash.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use persistence::repositories::AccessTokenRepository;
use shared::crypto::{is_well_formed_token, sha256_hex};

use crate::app::AppState;
use crate::error::ApiError;

/// Identity attached to requests that passed [`require_user_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub token_id: i64,
}

/// Returns the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthenticated() -> Response {
    ApiError::Unauthorized("Unauthenticated.".to_string()).into_response()
}

/// Middleware that requires a valid bearer token.
///
/// On success the [`AuthenticatedUser`] is stored in request extensions and
/// the token's `last_used_at` is refreshed in the background.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthenticated();
    };
    if !is_well_formed_token(token) {
        tracing::debug!("Rejected malformed bearer token");
        return unauthenticated();
    }

    let repo = AccessTokenRepository::new(state.pool.clone());
    let record = match repo.find_by_token_hash(&sha256_hex(token)).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!("Bearer token not found");
            return unauthenticated();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up access token");
            return ApiError::Internal("Authentication service unavailable".to_string())
                .into_response();
        }
    };

    if !record.token.is_valid_at(Utc::now()) {
        tracing::debug!(token_id = record.token.id, "Bearer token expired");
        return unauthenticated();
    }

    let auth = AuthenticatedUser {
        user_id: record.token.user_id,
        token_id: record.token.id,
    };

    let token_id = auth.token_id;
    tokio::spawn(async move {
        if let Err(e) = repo.touch_last_used(token_id).await {
            tracing::warn!(token_id, error = %e, "Failed to update token last_used_at");
        }
    });

    req.extensions_mut().insert(auth);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer tm_abc")), Some("tm_abc"));
        assert_eq!(bearer_token(&headers("Bearer   tm_abc ")), Some("tm_abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("bearer tm_abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_unauthenticated_status() {
        assert_eq!(unauthenticated().status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
