//! Cache for the locale bulk-read view.
//!
//! Entries are keyed `translations:{code}` and `translations:{code}:{device}`.
//! Writes clear all four keys of a locale regardless of which device type they
//! touched. A cache that errors behaves like an empty one.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;

use crate::models::translation::{DeviceType, LocaleTranslations};

/// How long a bulk-read result stays cached.
pub const LOCALE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const KEY_PREFIX: &str = "translations";

/// Error type for cache backends.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store with per-entry TTL holding locale bulk-read results.
#[async_trait::async_trait]
pub trait TranslationCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<LocaleTranslations>, CacheError>;

    async fn put(
        &self,
        key: &str,
        value: LocaleTranslations,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    async fn forget(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache key for a locale, optionally narrowed to one device type.
pub fn locale_cache_key(locale_code: &str, device_type: Option<DeviceType>) -> String {
    match device_type {
        Some(device_type) => format!("{}:{}:{}", KEY_PREFIX, locale_code, device_type),
        None => format!("{}:{}", KEY_PREFIX, locale_code),
    }
}

/// Every key a locale's bulk reads may be cached under.
pub fn locale_cache_keys(locale_code: &str) -> Vec<String> {
    std::iter::once(None)
        .chain(DeviceType::ALL.into_iter().map(Some))
        .map(|device_type| locale_cache_key(locale_code, device_type))
        .collect()
}

/// Looks a key up, treating backend errors as a miss.
pub async fn cached_translations(
    cache: &dyn TranslationCache,
    key: &str,
) -> Option<LocaleTranslations> {
    match cache.get(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Translation cache read failed, recomputing");
            None
        }
    }
}

/// Stores a bulk-read result; failures are logged and dropped.
pub async fn store_translations(
    cache: &dyn TranslationCache,
    key: &str,
    value: LocaleTranslations,
    ttl: Duration,
) {
    if let Err(e) = cache.put(key, value, ttl).await {
        tracing::warn!(key = %key, error = %e, "Translation cache write failed");
    }
}

/// Clears the bare and per-device keys for a locale.
pub async fn invalidate_locale(cache: &dyn TranslationCache, locale_code: &str) {
    for key in locale_cache_keys(locale_code) {
        if let Err(e) = cache.forget(&key).await {
            tracing::warn!(key = %key, error = %e, "Translation cache invalidation failed");
        }
    }
    tracing::debug!(locale = %locale_code, "Invalidated translation cache");
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: LocaleTranslations,
    expires_at: Instant,
}

/// Process-local cache backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryTranslationCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryTranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl TranslationCache for InMemoryTranslationCache {
    async fn get(&self, key: &str) -> Result<Option<LocaleTranslations>, CacheError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &str,
        value: LocaleTranslations,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Cache that never stores anything. Every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslationCache;

#[async_trait::async_trait]
impl TranslationCache for NullTranslationCache {
    async fn get(&self, _key: &str) -> Result<Option<LocaleTranslations>, CacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &str,
        _value: LocaleTranslations,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn forget(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
