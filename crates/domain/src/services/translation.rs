//! Translation service.
//!
//! Orchestrates translation use cases over an injected [`TranslationRepository`].
//! Operations forward to the repository unchanged; business rules that do not
//! belong to storage attach here.

use std::sync::Arc;

use crate::errors::RepositoryError;
use crate::models::translation::{
    DeviceType, GroupedTranslations, LocaleTranslations, TranslationDto, TranslationFilters,
    TranslationPage, TranslationPatch, DEFAULT_GROUP,
};

/// Storage contract for translations.
///
/// Implementations own cache population and invalidation for the
/// locale bulk read.
#[async_trait::async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Persists a new translation and returns it with its assigned id.
    async fn create(&self, dto: TranslationDto) -> Result<TranslationDto, RepositoryError>;

    /// Overwrites the provided fields of an existing translation.
    async fn update(
        &self,
        id: i64,
        patch: TranslationPatch,
    ) -> Result<TranslationDto, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn find(&self, id: i64) -> Result<Option<TranslationDto>, RepositoryError>;

    async fn search(&self, filters: TranslationFilters) -> Result<TranslationPage, RepositoryError>;

    /// Flat key → value mapping for a locale code, active or not.
    async fn get_by_locale(
        &self,
        locale_code: &str,
        device_type: Option<DeviceType>,
    ) -> Result<LocaleTranslations, RepositoryError>;
}

/// Translation use cases.
#[derive(Clone)]
pub struct TranslationService {
    repository: Arc<dyn TranslationRepository>,
}

impl TranslationService {
    pub fn new(repository: Arc<dyn TranslationRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_translation(
        &self,
        dto: TranslationDto,
    ) -> Result<TranslationDto, RepositoryError> {
        self.repository.create(dto).await
    }

    pub async fn update_translation(
        &self,
        id: i64,
        patch: TranslationPatch,
    ) -> Result<TranslationDto, RepositoryError> {
        self.repository.update(id, patch).await
    }

    pub async fn delete_translation(&self, id: i64) -> Result<bool, RepositoryError> {
        self.repository.delete(id).await
    }

    pub async fn get_translation(&self, id: i64) -> Result<Option<TranslationDto>, RepositoryError> {
        self.repository.find(id).await
    }

    pub async fn search_translations(
        &self,
        filters: TranslationFilters,
    ) -> Result<TranslationPage, RepositoryError> {
        self.repository.search(filters).await
    }

    pub async fn get_translations_by_locale(
        &self,
        locale_code: &str,
        device_type: Option<DeviceType>,
    ) -> Result<LocaleTranslations, RepositoryError> {
        self.repository.get_by_locale(locale_code, device_type).await
    }
}

/// Groups a flat mapping by the part of each key before its first `.`.
///
/// Keys without a dot, or with nothing before it, land in the `general` group.
/// The full key is kept inside its group.
pub fn group_translations_by_prefix(translations: LocaleTranslations) -> GroupedTranslations {
    let mut grouped = GroupedTranslations::new();
    for (key, value) in translations {
        let group = match key.split_once('.') {
            Some((prefix, _)) if !prefix.is_empty() => prefix.to_string(),
            _ => DEFAULT_GROUP.to_string(),
        };
        grouped.entry(group).or_default().insert(key, value);
    }
    grouped
}
