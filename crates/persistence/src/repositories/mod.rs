//! Repository implementations for database operations.

pub mod access_token;
pub mod locale;
pub mod translation;
pub mod user;

pub use access_token::AccessTokenRepository;
pub use locale::LocaleRepository;
pub use translation::PgTranslationRepository;
pub use user::UserRepository;
