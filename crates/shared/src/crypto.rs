//! Access token generation and hashing.
//!
//! Tokens are opaque to clients. Only the SHA-256 hash and a short prefix
//! are ever persisted.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Prefix every issued access token carries.
pub const TOKEN_PREFIX: &str = "tm_";

/// Number of random characters following [`TOKEN_PREFIX`].
pub const TOKEN_RANDOM_LEN: usize = 40;

/// Length of the identifying prefix stored next to the hash.
const STORED_PREFIX_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new plaintext access token (`tm_` + 40 alphanumerics).
pub fn generate_access_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{TOKEN_PREFIX}{random}")
}

/// Returns true if the value has the shape of a token we issued.
pub fn is_well_formed_token(token: &str) -> bool {
    token
        .strip_prefix(TOKEN_PREFIX)
        .map(|rest| rest.len() == TOKEN_RANDOM_LEN && rest.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(false)
}

/// Extracts the identifying prefix (first 8 characters after `tm_`).
pub fn extract_token_prefix(token: &str) -> Option<&str> {
    let rest = token.strip_prefix(TOKEN_PREFIX)?;
    rest.get(..STORED_PREFIX_LEN)
}
