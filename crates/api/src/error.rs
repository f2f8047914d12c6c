use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned when a create/update collides with an existing translation.
pub const DUPLICATE_TRANSLATION_MESSAGE: &str =
    "A translation with this key already exists for the specified locale, device type, and group.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate translation")]
    DuplicateTranslation,

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    /// The message is returned to the client as is; log internals before constructing.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Validation {
            message: message.clone(),
            details: vec![ValidationDetail {
                field: field.to_string(),
                message,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg, None),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials".to_string(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::DuplicateTranslation => (
                StatusCode::CONFLICT,
                "duplicate_translation",
                DUPLICATE_TRANSLATION_MESSAGE.to_string(),
                None,
            ),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(details),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg, None),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error");
        ApiError::Internal("An internal error occurred".into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_field("query", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_api_error_unauthorized() {
        let (status, body) = body_json(ApiError::Unauthorized("Unauthenticated.".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");
        assert_eq!(body["message"], "Unauthenticated.");
    }

    #[tokio::test]
    async fn test_api_error_invalid_credentials() {
        let (status, body) = body_json(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_api_error_not_found() {
        let (status, body) = body_json(ApiError::NotFound("Translation not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_api_error_duplicate_translation() {
        let (status, body) = body_json(ApiError::DuplicateTranslation).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate_translation");
        assert_eq!(body["message"], DUPLICATE_TRANSLATION_MESSAGE);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_api_error_internal_uses_given_message() {
        let message = "An error occurred while creating the translation.";
        let (status, body) = body_json(ApiError::Internal(message.into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "server_error");
        assert_eq!(body["message"], message);
    }

    #[tokio::test]
    async fn test_api_error_invalid_field() {
        let (status, body) =
            body_json(ApiError::invalid_field("locale_id", "The selected locale id is invalid."))
                .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "locale_id");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "The name field is required."))]
        name: String,
        #[validate(range(min = 1))]
        count: i64,
    }

    #[test]
    fn test_from_validation_errors_sorted_with_fallback_message() {
        let errors = Sample {
            name: String::new(),
            count: 0,
        }
        .validate()
        .unwrap_err();

        match ApiError::from(errors) {
            ApiError::Validation { message, details } => {
                assert_eq!(message, "2 validation errors");
                assert_eq!(details[0].field, "count");
                assert_eq!(details[0].message, "The count field is invalid.");
                assert_eq!(details[1].field, "name");
                assert_eq!(details[1].message, "The name field is required.");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_sqlx_error_hides_details() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        match error {
            ApiError::Internal(msg) => assert_eq!(msg, "An internal error occurred"),
            other => panic!("Expected Internal error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            ApiError::NotFound("x".to_string()).to_string(),
            "Not found: x"
        );
    }
}
