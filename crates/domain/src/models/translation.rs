//! Translation domain model.
//!
//! `TranslationDto` is the transport-neutral shape that flows between the
//! HTTP layer, the service and the repository. Request payloads carry their
//! own validation rules and are converted into DTOs only after validating.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::{Page, PageRequest};
use validator::Validate;

use super::locale::Locale;

/// Group assigned when the client does not send one.
pub const DEFAULT_GROUP: &str = "general";

/// Flat key → value view of a locale's translations.
pub type LocaleTranslations = BTreeMap<String, String>;

/// Device class a translation variant targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::Tablet, DeviceType::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(DeviceType::Mobile),
            "tablet" => Ok(DeviceType::Tablet),
            "desktop" => Ok(DeviceType::Desktop),
            other => Err(format!("Unknown device type: {}", other)),
        }
    }
}

/// Transport-neutral translation record.
///
/// `id` and the timestamps are `None` until the store assigns them. `locale`
/// is populated when the owning locale was loaded alongside the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationDto {
    pub id: Option<i64>,
    pub locale_id: i64,
    pub key: String,
    pub value: String,
    pub device_type: DeviceType,
    pub group: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub locale: Option<Locale>,
}

impl TranslationDto {
    /// New, not yet persisted translation with the default group and active flag.
    pub fn new(
        locale_id: i64,
        key: impl Into<String>,
        value: impl Into<String>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            id: None,
            locale_id,
            key: key.into(),
            value: value.into(),
            device_type,
            group: DEFAULT_GROUP.to_string(),
            is_active: true,
            created_at: None,
            updated_at: None,
            locale: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Partial update: only `Some` fields overwrite the stored row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationPatch {
    pub locale_id: Option<i64>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub device_type: Option<DeviceType>,
    pub group: Option<String>,
    pub is_active: Option<bool>,
}

impl TranslationPatch {
    pub fn is_empty(&self) -> bool {
        *self == TranslationPatch::default()
    }
}

/// Search criteria for listing translations. Unset filters impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationFilters {
    /// Substring match on the key.
    pub key: Option<String>,
    /// Substring match on the value.
    pub value: Option<String>,
    pub locale_id: Option<i64>,
    pub device_type: Option<DeviceType>,
    pub group: Option<String>,
    pub page: PageRequest,
}

/// Page of translations returned by a search.
pub type TranslationPage = Page<TranslationDto>;

// ============================================================================
// Request payloads
// ============================================================================

/// Validates a device type given as free text.
fn validate_device_type(value: &str) -> Result<(), validator::ValidationError> {
    value.parse::<DeviceType>().map(|_| ()).map_err(|_| {
        let mut err = validator::ValidationError::new("device_type");
        err.message = Some("The selected device type is invalid.".into());
        err
    })
}

/// Body of `POST /api/translations`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTranslationRequest {
    #[validate(
        required(message = "The locale id field is required."),
        range(min = 1, message = "The locale id must be a positive integer.")
    )]
    pub locale_id: Option<i64>,

    #[validate(
        required(message = "The key field is required."),
        length(min = 1, max = 255, message = "The key must be 1-255 characters."),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub key: Option<String>,

    #[validate(
        required(message = "The value field is required."),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub value: Option<String>,

    #[validate(
        required(message = "The device type field is required."),
        custom(function = "validate_device_type")
    )]
    pub device_type: Option<String>,

    #[validate(length(max = 50, message = "The group may not be greater than 50 characters."))]
    pub group: Option<String>,

    pub is_active: Option<bool>,
}

impl CreateTranslationRequest {
    /// Builds the DTO. Returns `None` if a required field is missing, which
    /// cannot happen once `validate()` succeeded.
    pub fn into_dto(self) -> Option<TranslationDto> {
        let device_type = self.device_type?.parse().ok()?;
        let dto = TranslationDto::new(self.locale_id?, self.key?, self.value?, device_type)
            .with_group(non_blank(self.group).unwrap_or_else(|| DEFAULT_GROUP.to_string()))
            .with_active(self.is_active.unwrap_or(true));
        Some(dto)
    }
}

/// Body of `PUT /api/translations/:id`. Same rules as create, nothing required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTranslationRequest {
    #[validate(range(min = 1, message = "The locale id must be a positive integer."))]
    pub locale_id: Option<i64>,

    #[validate(
        length(min = 1, max = 255, message = "The key must be 1-255 characters."),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub key: Option<String>,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub value: Option<String>,

    #[validate(custom(function = "validate_device_type"))]
    pub device_type: Option<String>,

    #[validate(length(max = 50, message = "The group may not be greater than 50 characters."))]
    pub group: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateTranslationRequest {
    pub fn into_patch(self) -> TranslationPatch {
        TranslationPatch {
            locale_id: self.locale_id,
            key: self.key,
            value: self.value,
            device_type: self.device_type.and_then(|d| d.parse().ok()),
            group: non_blank(self.group),
            is_active: self.is_active,
        }
    }
}

/// A blank group counts as not supplied.
fn non_blank(group: Option<String>) -> Option<String> {
    group.filter(|g| !g.trim().is_empty())
}

/// Query string of `GET /api/translations`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListTranslationsQuery {
    pub key: Option<String>,
    pub value: Option<String>,
    pub locale_id: Option<i64>,
    #[validate(custom(function = "validate_device_type"))]
    pub device_type: Option<String>,
    pub group: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl ListTranslationsQuery {
    pub fn into_filters(self) -> TranslationFilters {
        TranslationFilters {
            key: self.key,
            value: self.value,
            locale_id: self.locale_id,
            device_type: self.device_type.and_then(|d| d.parse().ok()),
            group: self.group,
            page: PageRequest::new(self.page, self.per_page),
        }
    }
}

/// Query string of the locale bulk-read endpoints.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LocaleTranslationsQuery {
    #[validate(custom(function = "validate_device_type"))]
    pub device_type: Option<String>,
}

impl LocaleTranslationsQuery {
    pub fn device_type(&self) -> Option<DeviceType> {
        self.device_type.as_deref().and_then(|d| d.parse().ok())
    }
}

// ============================================================================
// Response payloads
// ============================================================================

/// JSON projection of a translation.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResource {
    pub id: Option<i64>,
    pub locale_id: i64,
    pub key: String,
    pub value: String,
    pub device_type: DeviceType,
    pub group: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl From<TranslationDto> for TranslationResource {
    fn from(dto: TranslationDto) -> Self {
        Self {
            id: dto.id,
            locale_id: dto.locale_id,
            key: dto.key,
            value: dto.value,
            device_type: dto.device_type,
            group: dto.group,
            is_active: dto.is_active,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            locale: dto.locale,
        }
    }
}

/// `{ "data": ... }` wrapper for single-resource responses.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Paginated list response.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationListResponse {
    pub data: Vec<TranslationResource>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,
}

impl From<TranslationPage> for TranslationListResponse {
    fn from(page: TranslationPage) -> Self {
        let page = page.map(TranslationResource::from);
        Self {
            data: page.items,
            current_page: page.current_page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page,
        }
    }
}

/// Translations grouped for frontend consumption.
pub type GroupedTranslations = BTreeMap<String, LocaleTranslations>;

/// Format version reported by the JSON export endpoint.
pub const JSON_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct JsonTranslationsMeta {
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

/// Body of `GET /api/translations/json/:locale`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTranslationsResponse {
    pub translations: GroupedTranslations,
    pub locale: String,
    pub device_type: DeviceType,
    pub meta: JsonTranslationsMeta,
}

/// Body of a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteTranslationResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(body: serde_json::Value) -> CreateTranslationRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_device_type_roundtrip_through_str() {
        for device_type in DeviceType::ALL {
            assert_eq!(device_type.as_str().parse::<DeviceType>().unwrap(), device_type);
            assert_eq!(device_type.to_string(), device_type.as_str());
        }
        assert!("phone".parse::<DeviceType>().is_err());
        assert!("Desktop".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_device_type_default_is_desktop() {
        assert_eq!(DeviceType::default(), DeviceType::Desktop);
    }

    #[test]
    fn test_device_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DeviceType::Tablet).unwrap(), "\"tablet\"");
    }

    #[test]
    fn test_dto_defaults() {
        let dto = TranslationDto::new(1, "auth.login", "Login", DeviceType::Mobile);
        assert_eq!(dto.id, None);
        assert_eq!(dto.group, DEFAULT_GROUP);
        assert!(dto.is_active);
    }

    #[test]
    fn test_create_request_valid() {
        let request = create_request(json!({
            "locale_id": 1,
            "key": "x.y",
            "value": "v",
            "device_type": "desktop"
        }));
        assert!(request.validate().is_ok());

        let dto = request.into_dto().unwrap();
        assert_eq!(dto.locale_id, 1);
        assert_eq!(dto.key, "x.y");
        assert_eq!(dto.device_type, DeviceType::Desktop);
        assert_eq!(dto.group, "general");
        assert!(dto.is_active);
    }

    #[test]
    fn test_create_request_missing_required_fields() {
        let request = create_request(json!({}));
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["locale_id", "key", "value", "device_type"] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
        assert!(!fields.contains_key("group"));
    }

    #[test]
    fn test_create_request_rejects_unknown_device_type() {
        let request = create_request(json!({
            "locale_id": 1,
            "key": "x.y",
            "value": "v",
            "device_type": "watch"
        }));
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("device_type"));
    }

    #[test]
    fn test_create_request_length_limits() {
        let request = create_request(json!({
            "locale_id": 1,
            "key": "k".repeat(256),
            "value": "v",
            "device_type": "mobile",
            "group": "g".repeat(51)
        }));
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("key"));
        assert!(fields.contains_key("group"));

        let request = create_request(json!({
            "locale_id": 1,
            "key": "k".repeat(255),
            "value": "v",
            "device_type": "mobile",
            "group": "g".repeat(50)
        }));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_blank_key() {
        let request = create_request(json!({
            "locale_id": 1,
            "key": "   ",
            "value": "v",
            "device_type": "mobile"
        }));
        assert!(request.validate().unwrap_err().field_errors().contains_key("key"));
    }

    #[test]
    fn test_create_request_explicit_inactive() {
        let request = create_request(json!({
            "locale_id": 2,
            "key": "a",
            "value": "b",
            "device_type": "tablet",
            "group": "auth",
            "is_active": false
        }));
        let dto = request.into_dto().unwrap();
        assert!(!dto.is_active);
        assert_eq!(dto.group, "auth");
    }

    #[test]
    fn test_create_request_blank_group_uses_default() {
        for group in ["", "   "] {
            let request = create_request(json!({
                "locale_id": 1,
                "key": "x.y",
                "value": "v",
                "device_type": "mobile",
                "group": group
            }));
            assert!(request.validate().is_ok());
            assert_eq!(request.into_dto().unwrap().group, DEFAULT_GROUP);
        }
    }

    #[test]
    fn test_update_request_blank_group_leaves_group_untouched() {
        let request: UpdateTranslationRequest =
            serde_json::from_value(json!({ "group": " " })).unwrap();
        assert!(request.into_patch().is_empty());

        let request: UpdateTranslationRequest =
            serde_json::from_value(json!({ "group": "auth" })).unwrap();
        assert_eq!(request.into_patch().group.as_deref(), Some("auth"));
    }

    #[test]
    fn test_update_request_all_optional() {
        let request: UpdateTranslationRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.into_patch().is_empty());
    }

    #[test]
    fn test_update_request_still_checks_provided_fields() {
        let request: UpdateTranslationRequest =
            serde_json::from_value(json!({ "device_type": "fridge", "key": "" })).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("device_type"));
        assert!(errors.field_errors().contains_key("key"));
    }

    #[test]
    fn test_update_request_into_patch() {
        let request: UpdateTranslationRequest =
            serde_json::from_value(json!({ "value": "new", "device_type": "mobile" })).unwrap();
        let patch = request.into_patch();
        assert_eq!(patch.value.as_deref(), Some("new"));
        assert_eq!(patch.device_type, Some(DeviceType::Mobile));
        assert_eq!(patch.key, None);
    }

    #[test]
    fn test_list_query_into_filters_defaults() {
        let filters = ListTranslationsQuery::default().into_filters();
        assert_eq!(filters.page.per_page(), 15);
        assert_eq!(filters.page.page(), 1);
        assert!(filters.key.is_none());
    }

    #[test]
    fn test_list_query_into_filters() {
        let query = ListTranslationsQuery {
            key: Some("auth".into()),
            device_type: Some("tablet".into()),
            per_page: Some(5),
            page: Some(2),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
        let filters = query.into_filters();
        assert_eq!(filters.device_type, Some(DeviceType::Tablet));
        assert_eq!(filters.page.per_page(), 5);
        assert_eq!(filters.page.offset(), 5);
    }

    #[test]
    fn test_resource_omits_missing_locale() {
        let mut dto = TranslationDto::new(1, "a.b", "c", DeviceType::Desktop);
        dto.id = Some(9);
        let json = serde_json::to_value(TranslationResource::from(dto.clone())).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["locale_id"], 1);
        assert_eq!(json["device_type"], "desktop");
        assert!(json.get("locale").is_none());
        assert!(json.get("created_at").is_some());

        dto.locale = Some(Locale {
            id: 1,
            code: "en".into(),
            name: "English".into(),
        });
        let json = serde_json::to_value(TranslationResource::from(dto)).unwrap();
        assert_eq!(json["locale"]["code"], "en");
    }

    #[test]
    fn test_list_response_from_page() {
        let dto = TranslationDto::new(1, "a", "b", DeviceType::Mobile);
        let page = Page::new(vec![dto], 6, PageRequest::new(Some(1), Some(5)));
        let response = TranslationListResponse::from(page);
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.total, 6);
        assert_eq!(response.last_page, 2);
    }
}
