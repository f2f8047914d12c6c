//! Locale entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the locales table.
#[derive(Debug, Clone, FromRow)]
pub struct LocaleEntity {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocaleEntity> for domain::models::Locale {
    fn from(entity: LocaleEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
        }
    }
}
