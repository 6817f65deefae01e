//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Logs are safe to share for debugging. These functions ensure no
//! sensitive data (access tokens, spoken task text, raw API bodies) leaks
//! into spans or log lines.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use secrecy::{ExposeSecret, SecretString};

/// Maximum length for remote error bodies kept in messages and logs.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Describes free text by its length only.
///
/// Slot values are whatever the user said, so they stay out of logs.
pub fn redact_text(text: &str) -> String {
    format!("<{} chars>", text.chars().count())
}

/// Returns a short deterministic fingerprint of a secret for correlation
/// (and cache keys) without exposing the secret itself.
pub fn fingerprint_secret(secret: &SecretString) -> String {
    let mut hasher = DefaultHasher::new();
    secret.expose_secret().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Truncates a response body to `max` characters, respecting UTF-8
/// boundaries.
pub fn truncate_body(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}... (truncated)", &body[..idx]),
        None => body.to_string(),
    }
}
