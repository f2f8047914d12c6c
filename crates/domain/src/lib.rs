//! Domain layer for the translation manager backend.
//!
//! This crate contains:
//! - Domain models (Locale, Translation, User)
//! - The translation service and the repository/cache seams it depends on
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
