//! Authentication service: credential checks and token issuance.

use chrono::{DateTime, Duration, Utc};
use domain::models::{LoginResponse, User, UserResponse};
use persistence::repositories::{AccessTokenRepository, UserRepository};
use shared::crypto::{extract_token_prefix, generate_access_token, sha256_hex};
use shared::password::{verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            other => {
                tracing::error!(error = %other, "Login failed");
                ApiError::Internal("An error occurred while logging in.".to_string())
            }
        }
    }
}

/// Checks credentials and issues opaque bearer tokens.
pub struct AuthService {
    users: UserRepository,
    tokens: AccessTokenRepository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: AccessTokenRepository::new(pool),
            config,
        }
    }

    /// Verifies email and password, then issues a token for the user.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user: User = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        match verify_password(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials),
            Err(PasswordError::InvalidHashFormat) => {
                tracing::warn!(user_id = user.id, "Stored password hash is unusable");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        let token = self.issue_token(user.id).await?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// Creates and stores a new token, returning its plaintext once.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, AuthError> {
        let token = generate_access_token();
        let prefix = extract_token_prefix(&token).unwrap_or_default();
        let expires_at = token_expiry(self.config.token_expiry_secs, Utc::now());

        self.tokens
            .create(
                user_id,
                &self.config.token_name,
                &sha256_hex(&token),
                prefix,
                expires_at,
            )
            .await?;

        Ok(token)
    }
}

/// Expiry for a token issued at `now`; `None` when tokens never expire.
fn token_expiry(expiry_secs: u64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if expiry_secs == 0 {
        return None;
    }
    let secs = i64::try_from(expiry_secs).ok()?;
    Duration::try_seconds(secs).and_then(|d| now.checked_add_signed(d))
}
