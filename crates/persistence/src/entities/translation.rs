//! Translation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DeviceType, Locale, TranslationDto};
use sqlx::FromRow;

/// Database enum for device_type that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_type", rename_all = "lowercase")]
pub enum DeviceTypeDb {
    Mobile,
    Tablet,
    Desktop,
}

impl From<DeviceTypeDb> for DeviceType {
    fn from(db: DeviceTypeDb) -> Self {
        match db {
            DeviceTypeDb::Mobile => DeviceType::Mobile,
            DeviceTypeDb::Tablet => DeviceType::Tablet,
            DeviceTypeDb::Desktop => DeviceType::Desktop,
        }
    }
}

impl From<DeviceType> for DeviceTypeDb {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Mobile => DeviceTypeDb::Mobile,
            DeviceType::Tablet => DeviceTypeDb::Tablet,
            DeviceType::Desktop => DeviceTypeDb::Desktop,
        }
    }
}

/// Translation row joined with its owning locale.
#[derive(Debug, Clone, FromRow)]
pub struct TranslationWithLocaleEntity {
    pub id: i64,
    pub locale_id: i64,
    pub key: String,
    pub value: String,
    pub device_type: DeviceTypeDb,
    pub group: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub locale_code: String,
    pub locale_name: String,
}

impl From<TranslationWithLocaleEntity> for TranslationDto {
    fn from(entity: TranslationWithLocaleEntity) -> Self {
        Self {
            id: Some(entity.id),
            locale_id: entity.locale_id,
            key: entity.key,
            value: entity.value,
            device_type: entity.device_type.into(),
            group: entity.group,
            is_active: entity.is_active,
            created_at: Some(entity.created_at),
            updated_at: Some(entity.updated_at),
            locale: Some(Locale {
                id: entity.locale_id,
                code: entity.locale_code,
                name: entity.locale_name,
            }),
        }
    }
}

/// Result of an update: the new row plus the locale code it had before.
#[derive(Debug, Clone, FromRow)]
pub struct UpdatedTranslationEntity {
    #[sqlx(flatten)]
    pub translation: TranslationWithLocaleEntity,
    pub previous_locale_code: String,
}

/// Key/value pair read for the locale bulk view.
#[derive(Debug, Clone, FromRow)]
pub struct TranslationPairEntity {
    pub key: String,
    pub value: String,
}
