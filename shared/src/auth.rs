//! Shared-secret authentication between widget and relay.

use lambda_http::http::HeaderMap;

use crate::{Error, Result};

/// Header carrying the widget's shared secret.
pub const WIDGET_KEY_HEADER: &str = "x-widget-key";

/// Check the `x-widget-key` header against the configured secret.
///
/// A missing header, a non-UTF-8 value, or any mismatch is `Error::Auth`.
pub fn verify_widget_key(headers: &HeaderMap, expected: &str) -> Result<()> {
    let provided = headers
        .get(WIDGET_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::Auth)?;

    if keys_match(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(Error::Auth)
    }
}

/// Length-checked comparison that inspects every byte.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
