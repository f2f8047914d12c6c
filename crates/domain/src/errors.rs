//! Domain error types.

use thiserror::Error;

/// Errors surfaced by translation storage.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The (locale, key, device_type, group) tuple is already taken.
    #[error("A translation with this key already exists for the specified locale, device type, and group")]
    DuplicateEntry,

    #[error("Translation {0} not found")]
    NotFound(i64),

    #[error("Locale {0} does not exist")]
    UnknownLocale(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Maps a driver error onto the domain error, recognising constraint violations.
    ///
    /// `locale_id` is reported back when a foreign-key violation is detected.
    pub fn from_write(err: sqlx::Error, locale_id: Option<i64>) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => return RepositoryError::DuplicateEntry,
                Some("23503") => return RepositoryError::UnknownLocale(locale_id.unwrap_or_default()),
                _ => {}
            }
        }
        RepositoryError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(RepositoryError::NotFound(7).to_string(), "Translation 7 not found");
        assert_eq!(RepositoryError::UnknownLocale(3).to_string(), "Locale 3 does not exist");
        assert!(RepositoryError::DuplicateEntry.to_string().contains("already exists"));
    }

    #[test]
    fn test_from_write_passes_through_non_constraint_errors() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, Some(1));
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }
}
