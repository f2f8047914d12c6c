//! Locale domain model.

use serde::{Deserialize, Serialize};

/// Locales created by the seed utility when none exist yet.
pub const DEFAULT_LOCALE_CODES: [&str; 5] = ["en", "fr", "es", "de", "it"];

/// A language/region identified by a short code (e.g. "en").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// Display name used when a locale is created on demand without one.
pub fn default_locale_name(code: &str) -> String {
    code.to_uppercase()
}
