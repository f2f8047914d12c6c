//! Translation endpoint handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use domain::errors::RepositoryError;
use domain::models::translation::{
    CreateTranslationRequest, DataEnvelope, DeleteTranslationResponse, JsonTranslationsMeta,
    JsonTranslationsResponse, ListTranslationsQuery, LocaleTranslationsQuery,
    TranslationListResponse, TranslationResource, UpdateTranslationRequest, JSON_FORMAT_VERSION,
};
use domain::models::LocaleTranslations;
use domain::services::group_translations_by_prefix;
use persistence::repositories::LocaleRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_translation_write;
use crate::middleware::RequestId;

const CREATE_FAILED: &str = "An error occurred while creating the translation.";
const UPDATE_FAILED: &str = "An error occurred while updating the translation.";
const DELETE_FAILED: &str = "An error occurred while deleting the translation.";
const FETCH_FAILED: &str = "An error occurred while fetching translations.";
const NOT_FOUND: &str = "Translation not found";
const UNKNOWN_LOCALE: &str = "The selected locale id is invalid.";

/// Non-numeric ids can never match a row.
fn translation_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Rejects a `locale_id` that does not reference an existing locale.
async fn ensure_locale_exists(
    state: &AppState,
    locale_id: i64,
    failure_message: &str,
) -> Result<(), ApiError> {
    let exists = LocaleRepository::new(state.pool.clone())
        .exists(locale_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, locale_id, "Failed to check locale");
            ApiError::Internal(failure_message.to_string())
        })?;

    if exists {
        Ok(())
    } else {
        Err(ApiError::invalid_field("locale_id", UNKNOWN_LOCALE))
    }
}

/// List translations with filters and pagination.
///
/// GET /api/translations
pub async fn list_translations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<ListTranslationsQuery>, QueryRejection>,
) -> Result<Json<TranslationListResponse>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let filters = query.into_filters();
    let page = state
        .translations
        .search_translations(filters.clone())
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                filters = ?filters,
                "Failed to search translations"
            );
            ApiError::Internal(FETCH_FAILED.to_string())
        })?;

    Ok(Json(page.into()))
}

/// Create a translation.
///
/// POST /api/translations
pub async fn create_translation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    UserAuth(user): UserAuth,
    payload: Result<Json<CreateTranslationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<TranslationResource>>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let dto = request
        .into_dto()
        .ok_or_else(|| ApiError::Internal(CREATE_FAILED.to_string()))?;
    ensure_locale_exists(&state, dto.locale_id, CREATE_FAILED).await?;

    let context = format!(
        "locale_id={} key={} device_type={} group={}",
        dto.locale_id, dto.key, dto.device_type, dto.group
    );

    match state.translations.create_translation(dto).await {
        Ok(created) => {
            tracing::info!(
                translation_id = ?created.id,
                locale_id = created.locale_id,
                user_id = user.user_id,
                "Translation created"
            );
            record_translation_write("create");
            Ok((
                StatusCode::CREATED,
                Json(DataEnvelope {
                    data: created.into(),
                }),
            ))
        }
        Err(RepositoryError::DuplicateEntry) => Err(ApiError::DuplicateTranslation),
        Err(RepositoryError::UnknownLocale(_)) => {
            Err(ApiError::invalid_field("locale_id", UNKNOWN_LOCALE))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                request = %context,
                "Failed to create translation"
            );
            Err(ApiError::Internal(CREATE_FAILED.to_string()))
        }
    }
}

/// Show a single translation with its locale.
///
/// GET /api/translations/:id
pub async fn show_translation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DataEnvelope<TranslationResource>>, ApiError> {
    let id = translation_id(path)?;

    let translation = state
        .translations
        .get_translation(id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id.0, id, "Failed to fetch translation");
            ApiError::Internal(FETCH_FAILED.to_string())
        })?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataEnvelope {
        data: translation.into(),
    }))
}

/// Update the provided fields of a translation.
///
/// PUT/PATCH /api/translations/:id
pub async fn update_translation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    UserAuth(user): UserAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTranslationRequest>, JsonRejection>,
) -> Result<Json<DataEnvelope<TranslationResource>>, ApiError> {
    let id = translation_id(path)?;
    let Json(request) = payload?;
    request.validate()?;

    if let Some(locale_id) = request.locale_id {
        ensure_locale_exists(&state, locale_id, UPDATE_FAILED).await?;
    }

    let patch = request.into_patch();
    let context = format!("{:?}", patch);

    match state.translations.update_translation(id, patch).await {
        Ok(updated) => {
            tracing::info!(
                translation_id = id,
                locale_id = updated.locale_id,
                user_id = user.user_id,
                "Translation updated"
            );
            record_translation_write("update");
            Ok(Json(DataEnvelope {
                data: updated.into(),
            }))
        }
        Err(RepositoryError::NotFound(_)) => Err(ApiError::NotFound(NOT_FOUND.to_string())),
        Err(RepositoryError::DuplicateEntry) => Err(ApiError::DuplicateTranslation),
        Err(RepositoryError::UnknownLocale(_)) => {
            Err(ApiError::invalid_field("locale_id", UNKNOWN_LOCALE))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                translation_id = id,
                request = %context,
                "Failed to update translation"
            );
            Err(ApiError::Internal(UPDATE_FAILED.to_string()))
        }
    }
}

/// Delete a translation.
///
/// DELETE /api/translations/:id
pub async fn delete_translation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    UserAuth(user): UserAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteTranslationResponse>, ApiError> {
    let id = translation_id(path)?;

    match state.translations.delete_translation(id).await {
        Ok(_) => {
            tracing::info!(translation_id = id, user_id = user.user_id, "Translation deleted");
            record_translation_write("delete");
            Ok(Json(DeleteTranslationResponse {
                message: "Translation deleted successfully".to_string(),
            }))
        }
        Err(RepositoryError::NotFound(_)) => Err(ApiError::NotFound(NOT_FOUND.to_string())),
        Err(e) => {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                translation_id = id,
                "Failed to delete translation"
            );
            Err(ApiError::Internal(DELETE_FAILED.to_string()))
        }
    }
}

/// Flat key → value mapping for a locale.
///
/// GET /api/translations/locale/:locale
pub async fn get_by_locale(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(locale): Path<String>,
    query: Result<Query<LocaleTranslationsQuery>, QueryRejection>,
) -> Result<Json<LocaleTranslations>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let translations = state
        .translations
        .get_translations_by_locale(&locale, query.device_type())
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                locale = %locale,
                device_type = ?query.device_type(),
                "Failed to fetch translations by locale"
            );
            ApiError::Internal(FETCH_FAILED.to_string())
        })?;

    Ok(Json(translations))
}

/// Translations grouped by key prefix for frontend bundles. Public.
///
/// GET /api/translations/json/:locale
pub async fn get_json_translations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(locale): Path<String>,
    query: Result<Query<LocaleTranslationsQuery>, QueryRejection>,
) -> Result<Json<JsonTranslationsResponse>, ApiError> {
    let Query(query) = query?;
    query.validate()?;
    let device_type = query.device_type().unwrap_or_default();

    let translations = state
        .translations
        .get_translations_by_locale(&locale, Some(device_type))
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %request_id.0,
                locale = %locale,
                device_type = %device_type,
                "Failed to fetch JSON translations"
            );
            ApiError::Internal(FETCH_FAILED.to_string())
        })?;

    Ok(Json(JsonTranslationsResponse {
        translations: group_translations_by_prefix(translations),
        locale,
        device_type,
        meta: JsonTranslationsMeta {
            generated_at: Utc::now(),
            version: JSON_FORMAT_VERSION.to_string(),
        },
    }))
}
