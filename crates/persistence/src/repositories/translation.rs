//! Translation repository for database operations.
//!
//! Implements the domain [`TranslationRepository`] over PostgreSQL and owns the
//! read-through cache for the locale bulk view. Every successful write clears
//! the cached views of the affected locale(s).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use domain::errors::RepositoryError;
use domain::models::{
    DeviceType, LocaleTranslations, TranslationDto, TranslationFilters, TranslationPage,
    TranslationPatch,
};
use domain::services::cache::{
    cached_translations, invalidate_locale, locale_cache_key, store_translations, TranslationCache,
};
use domain::services::TranslationRepository;
use shared::pagination::Page;
use sqlx::PgPool;

use crate::entities::{
    DeviceTypeDb, TranslationPairEntity, TranslationWithLocaleEntity, UpdatedTranslationEntity,
};
use crate::metrics::{record_cache_hit, record_cache_miss, QueryTimer};

const TRANSLATION_COLUMNS: &str = r#"
    t.id, t.locale_id, t.key, t.value, t.device_type, t."group", t.is_active,
    t.created_at, t.updated_at, l.code AS locale_code, l.name AS locale_name
"#;

/// Repository for translation-related database operations.
#[derive(Clone)]
pub struct PgTranslationRepository {
    pool: PgPool,
    cache: Arc<dyn TranslationCache>,
    cache_ttl: Duration,
}

impl PgTranslationRepository {
    /// Creates a new repository with the given pool and bulk-read cache.
    pub fn new(pool: PgPool, cache: Arc<dyn TranslationCache>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache,
            cache_ttl,
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts many translations at once, skipping rows whose
    /// (locale, key, device_type, group) tuple already exists.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_batch(&self, rows: &[TranslationDto]) -> Result<u64, RepositoryError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let locale_ids: Vec<i64> = rows.iter().map(|r| r.locale_id).collect();
        let keys: Vec<String> = rows.iter().map(|r| r.key.clone()).collect();
        let values: Vec<String> = rows.iter().map(|r| r.value.clone()).collect();
        let device_types: Vec<String> = rows.iter().map(|r| r.device_type.to_string()).collect();
        let groups: Vec<String> = rows.iter().map(|r| r.group.clone()).collect();
        let actives: Vec<bool> = rows.iter().map(|r| r.is_active).collect();

        let timer = QueryTimer::new("insert_translation_batch");
        let result = sqlx::query(
            r#"
            INSERT INTO translations (locale_id, key, value, device_type, "group", is_active)
            SELECT r.locale_id, r.key, r.value, r.device_type::device_type, r.grp, r.is_active
            FROM UNNEST($1::bigint[], $2::varchar[], $3::text[], $4::text[], $5::varchar[], $6::bool[])
                AS r(locale_id, key, value, device_type, grp, is_active)
            ON CONFLICT (locale_id, key, device_type, "group") DO NOTHING
            "#,
        )
        .bind(&locale_ids)
        .bind(&keys)
        .bind(&values)
        .bind(&device_types)
        .bind(&groups)
        .bind(&actives)
        .execute(&self.pool)
        .await;
        timer.record();
        let inserted = result.map_err(|e| RepositoryError::from_write(e, None))?.rows_affected();

        let distinct_ids: Vec<i64> = locale_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes: Vec<String> =
            sqlx::query_scalar::<_, String>("SELECT code FROM locales WHERE id = ANY($1)")
                .bind(&distinct_ids)
                .fetch_all(&self.pool)
                .await?;
        for code in codes {
            invalidate_locale(self.cache.as_ref(), &code).await;
        }

        Ok(inserted)
    }

    /// Builds the WHERE clause for a search, numbering placeholders from `$1`.
    ///
    /// Returns the clause (empty when no filter is set) and the next free index.
    fn search_conditions(filters: &TranslationFilters) -> (String, usize) {
        let mut param_idx = 1;
        let mut conditions = Vec::new();

        if filters.key.is_some() {
            conditions.push(format!("t.key LIKE ${}", param_idx));
            param_idx += 1;
        }
        if filters.value.is_some() {
            conditions.push(format!("t.value LIKE ${}", param_idx));
            param_idx += 1;
        }
        if filters.locale_id.is_some() {
            conditions.push(format!("t.locale_id = ${}", param_idx));
            param_idx += 1;
        }
        if filters.device_type.is_some() {
            conditions.push(format!("t.device_type = ${}", param_idx));
            param_idx += 1;
        }
        if filters.group.is_some() {
            conditions.push(format!(r#"t."group" = ${}"#, param_idx));
            param_idx += 1;
        }

        if conditions.is_empty() {
            (String::new(), param_idx)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), param_idx)
        }
    }
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

#[async_trait::async_trait]
impl TranslationRepository for PgTranslationRepository {
    async fn create(&self, dto: TranslationDto) -> Result<TranslationDto, RepositoryError> {
        let timer = QueryTimer::new("create_translation");
        let result = sqlx::query_as::<_, TranslationWithLocaleEntity>(&format!(
            r#"
            WITH t AS (
                INSERT INTO translations (locale_id, key, value, device_type, "group", is_active)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {}
            FROM t
            JOIN locales l ON l.id = t.locale_id
            "#,
            TRANSLATION_COLUMNS
        ))
        .bind(dto.locale_id)
        .bind(&dto.key)
        .bind(&dto.value)
        .bind(DeviceTypeDb::from(dto.device_type))
        .bind(&dto.group)
        .bind(dto.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        let entity = result.map_err(|e| RepositoryError::from_write(e, Some(dto.locale_id)))?;
        invalidate_locale(self.cache.as_ref(), &entity.locale_code).await;
        Ok(entity.into())
    }

    async fn update(
        &self,
        id: i64,
        patch: TranslationPatch,
    ) -> Result<TranslationDto, RepositoryError> {
        let timer = QueryTimer::new("update_translation");
        let result = sqlx::query_as::<_, UpdatedTranslationEntity>(&format!(
            r#"
            WITH previous AS (
                SELECT pt.id, pl.code AS previous_locale_code
                FROM translations pt
                JOIN locales pl ON pl.id = pt.locale_id
                WHERE pt.id = $1
            ),
            t AS (
                UPDATE translations
                SET locale_id = COALESCE($2, locale_id),
                    key = COALESCE($3, key),
                    value = COALESCE($4, value),
                    device_type = COALESCE($5, device_type),
                    "group" = COALESCE($6, "group"),
                    is_active = COALESCE($7, is_active),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {}, p.previous_locale_code
            FROM t
            JOIN locales l ON l.id = t.locale_id
            JOIN previous p ON p.id = t.id
            "#,
            TRANSLATION_COLUMNS
        ))
        .bind(id)
        .bind(patch.locale_id)
        .bind(patch.key.as_deref())
        .bind(patch.value.as_deref())
        .bind(patch.device_type.map(DeviceTypeDb::from))
        .bind(patch.group.as_deref())
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        let updated = result
            .map_err(|e| RepositoryError::from_write(e, patch.locale_id))?
            .ok_or(RepositoryError::NotFound(id))?;

        invalidate_locale(self.cache.as_ref(), &updated.previous_locale_code).await;
        if updated.translation.locale_code != updated.previous_locale_code {
            invalidate_locale(self.cache.as_ref(), &updated.translation.locale_code).await;
        }

        Ok(updated.translation.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let timer = QueryTimer::new("delete_translation");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            WITH deleted AS (
                DELETE FROM translations
                WHERE id = $1
                RETURNING locale_id
            )
            SELECT l.code
            FROM deleted d
            JOIN locales l ON l.id = d.locale_id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        let locale_code = result?.ok_or(RepositoryError::NotFound(id))?;
        invalidate_locale(self.cache.as_ref(), &locale_code).await;
        Ok(true)
    }

    async fn find(&self, id: i64) -> Result<Option<TranslationDto>, RepositoryError> {
        let timer = QueryTimer::new("find_translation_by_id");
        let result = sqlx::query_as::<_, TranslationWithLocaleEntity>(&format!(
            r#"
            SELECT {}
            FROM translations t
            JOIN locales l ON l.id = t.locale_id
            WHERE t.id = $1
            "#,
            TRANSLATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    async fn search(&self, filters: TranslationFilters) -> Result<TranslationPage, RepositoryError> {
        let (where_clause, param_idx) = Self::search_conditions(&filters);
        let key_pattern = filters.key.as_deref().map(like_pattern);
        let value_pattern = filters.value.as_deref().map(like_pattern);
        let device_type = filters.device_type.map(DeviceTypeDb::from);

        let count_sql = format!("SELECT COUNT(*) FROM translations t{}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(pattern) = &key_pattern {
            count_query = count_query.bind(pattern);
        }
        if let Some(pattern) = &value_pattern {
            count_query = count_query.bind(pattern);
        }
        if let Some(locale_id) = filters.locale_id {
            count_query = count_query.bind(locale_id);
        }
        if let Some(device_type) = device_type {
            count_query = count_query.bind(device_type);
        }
        if let Some(group) = &filters.group {
            count_query = count_query.bind(group);
        }

        let timer = QueryTimer::new("count_translations");
        let total = count_query.fetch_one(&self.pool).await;
        timer.record();
        let total = total?;

        let list_sql = format!(
            r#"
            SELECT {}
            FROM translations t
            JOIN locales l ON l.id = t.locale_id
            {}
            ORDER BY t.id ASC
            LIMIT ${} OFFSET ${}
            "#,
            TRANSLATION_COLUMNS,
            where_clause,
            param_idx,
            param_idx + 1
        );
        let mut list_query = sqlx::query_as::<_, TranslationWithLocaleEntity>(&list_sql);
        if let Some(pattern) = &key_pattern {
            list_query = list_query.bind(pattern);
        }
        if let Some(pattern) = &value_pattern {
            list_query = list_query.bind(pattern);
        }
        if let Some(locale_id) = filters.locale_id {
            list_query = list_query.bind(locale_id);
        }
        if let Some(device_type) = device_type {
            list_query = list_query.bind(device_type);
        }
        if let Some(group) = &filters.group {
            list_query = list_query.bind(group);
        }
        list_query = list_query
            .bind(filters.page.limit())
            .bind(filters.page.offset());

        let timer = QueryTimer::new("search_translations");
        let entities = list_query.fetch_all(&self.pool).await;
        timer.record();

        let items = entities?.into_iter().map(TranslationDto::from).collect();
        Ok(Page::new(items, total, filters.page))
    }

    async fn get_by_locale(
        &self,
        locale_code: &str,
        device_type: Option<DeviceType>,
    ) -> Result<LocaleTranslations, RepositoryError> {
        let cache_key = locale_cache_key(locale_code, device_type);
        if let Some(cached) = cached_translations(self.cache.as_ref(), &cache_key).await {
            record_cache_hit();
            return Ok(cached);
        }
        record_cache_miss();

        let timer = QueryTimer::new("get_translations_by_locale");
        let result = match device_type {
            Some(device_type) => {
                sqlx::query_as::<_, TranslationPairEntity>(
                    r#"
                    SELECT t.key, t.value
                    FROM translations t
                    JOIN locales l ON l.id = t.locale_id
                    WHERE l.code = $1 AND t.device_type = $2
                    ORDER BY t.id ASC
                    "#,
                )
                .bind(locale_code)
                .bind(DeviceTypeDb::from(device_type))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TranslationPairEntity>(
                    r#"
                    SELECT t.key, t.value
                    FROM translations t
                    JOIN locales l ON l.id = t.locale_id
                    WHERE l.code = $1
                    ORDER BY t.id ASC
                    "#,
                )
                .bind(locale_code)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();

        // Later rows overwrite earlier ones sharing a key.
        let translations: LocaleTranslations = result?
            .into_iter()
            .map(|pair| (pair.key, pair.value))
            .collect();

        store_translations(
            self.cache.as_ref(),
            &cache_key,
            translations.clone(),
            self.cache_ttl,
        )
        .await;

        Ok(translations)
    }
}
