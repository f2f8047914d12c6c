//! Locale repository for database operations.

use sqlx::PgPool;

use crate::entities::LocaleEntity;
use crate::metrics::QueryTimer;

/// Repository for locale-related database operations.
#[derive(Clone)]
pub struct LocaleRepository {
    pool: PgPool,
}

impl LocaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<LocaleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_locale_by_id");
        let result = sqlx::query_as::<_, LocaleEntity>(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM locales
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a locale with this id exists.
    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("locale_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM locales WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All locales ordered by id.
    pub async fn list(&self) -> Result<Vec<LocaleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_locales");
        let result = sqlx::query_as::<_, LocaleEntity>(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM locales
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the locale with `code`, creating it with `name` if missing.
    pub async fn first_or_create(&self, code: &str, name: &str) -> Result<LocaleEntity, sqlx::Error> {
        let timer = QueryTimer::new("first_or_create_locale");
        let result = sqlx::query_as::<_, LocaleEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO locales (code, name)
                VALUES ($1, $2)
                ON CONFLICT (code) DO NOTHING
                RETURNING id, code, name, created_at, updated_at
            )
            SELECT id, code, name, created_at, updated_at FROM inserted
            UNION ALL
            SELECT id, code, name, created_at, updated_at FROM locales WHERE code = $1
            LIMIT 1
            "#,
        )
        .bind(code)
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
