//! Application services used by route handlers.

pub mod auth;

pub use auth::{AuthError, AuthService};
