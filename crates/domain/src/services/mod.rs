//! Domain services for the translation manager.

pub mod cache;
pub mod translation;

pub use cache::{
    invalidate_locale, locale_cache_key, locale_cache_keys, CacheError, InMemoryTranslationCache,
    NullTranslationCache, TranslationCache, LOCALE_CACHE_TTL,
};
pub use translation::{group_translations_by_prefix, TranslationRepository, TranslationService};
