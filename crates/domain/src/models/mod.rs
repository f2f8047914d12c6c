//! Domain models for the translation manager.

pub mod locale;
pub mod translation;
pub mod user;

pub use locale::Locale;
pub use translation::{
    DeviceType, LocaleTranslations, TranslationDto, TranslationFilters, TranslationPage,
    TranslationPatch, DEFAULT_GROUP,
};
pub use user::{LoginRequest, LoginResponse, User, UserResponse};
