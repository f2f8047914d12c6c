//! Common validation utilities.

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Field must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("welcome.message").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t\n").is_err());
    }

    #[test]
    fn test_validate_not_blank_error_code() {
        let err = validate_not_blank("").unwrap_err();
        assert_eq!(err.code, "blank");
    }
}
