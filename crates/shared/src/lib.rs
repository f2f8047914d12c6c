//! Shared utilities for the translation manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Access token generation and hashing
//! - Password hashing with Argon2id
//! - Page-based pagination primitives
//! - Reusable field validators

pub mod crypto;
pub mod pagination;
pub mod password;
pub mod validation;
