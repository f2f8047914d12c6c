//! Personal access token entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the personal_access_tokens table.
#[derive(Debug, Clone, FromRow)]
pub struct AccessTokenEntity {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
    pub token_prefix: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccessTokenEntity {
    /// A token without an expiry never expires.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > at)
    }
}

/// Token row joined with the owning user's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct AccessTokenWithUserEntity {
    #[sqlx(flatten)]
    pub token: AccessTokenEntity,
    pub user_name: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_token(expires_at: Option<DateTime<Utc>>) -> AccessTokenEntity {
        AccessTokenEntity {
            id: 1,
            user_id: 1,
            name: "api-token".to_string(),
            token_hash: "a".repeat(64),
            token_prefix: "tm_aBcDe".to_string(),
            last_used_at: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_without_expiry_is_valid() {
        assert!(make_token(None).is_valid_at(Utc::now()));
    }

    #[test]
    fn test_token_expiry_boundaries() {
        let now = Utc::now();
        assert!(make_token(Some(now + Duration::hours(1))).is_valid_at(now));
        assert!(!make_token(Some(now - Duration::seconds(1))).is_valid_at(now));
        assert!(!make_token(Some(now)).is_valid_at(now));
    }
}
