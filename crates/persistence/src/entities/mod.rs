//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod access_token;
pub mod locale;
pub mod translation;
pub mod user;

pub use access_token::{AccessTokenEntity, AccessTokenWithUserEntity};
pub use locale::LocaleEntity;
pub use translation::{
    DeviceTypeDb, TranslationPairEntity, TranslationWithLocaleEntity, UpdatedTranslationEntity,
};
pub use user::UserEntity;
