//! Repository for personal access token operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{AccessTokenEntity, AccessTokenWithUserEntity};
use crate::metrics::QueryTimer;

/// Repository for personal access token operations.
#[derive(Clone)]
pub struct AccessTokenRepository {
    pool: PgPool,
}

impl AccessTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a newly issued token. Only its hash and display prefix are kept.
    pub async fn create(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
        token_prefix: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AccessTokenEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_access_token");
        let result = sqlx::query_as::<_, AccessTokenEntity>(
            r#"
            INSERT INTO personal_access_tokens (user_id, name, token_hash, token_prefix, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, token_hash, token_prefix, last_used_at, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(token_hash)
        .bind(token_prefix)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a token by its hash together with its owner.
    ///
    /// Returns `None` if no token with the given hash exists.
    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<AccessTokenWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_access_token_by_hash");
        let result = sqlx::query_as::<_, AccessTokenWithUserEntity>(
            r#"
            SELECT t.id, t.user_id, t.name, t.token_hash, t.token_prefix,
                   t.last_used_at, t.expires_at, t.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM personal_access_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates the last_used_at timestamp for a token.
    ///
    /// Called in the background after successful authentication.
    pub async fn touch_last_used(&self, token_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE personal_access_tokens
            SET last_used_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(token_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
