//! Login endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::{LoginRequest, LoginResponse};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::AuthService;

/// Exchange email and password for a bearer token.
///
/// POST /login, POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::invalid_field("email", "The email field is required."));
    };

    let service = AuthService::new(state.pool.clone(), state.config.auth.clone());
    let response = service.login(&email, &password).await?;
    Ok(Json(response))
}
