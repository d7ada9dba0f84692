//! HTTP Basic authorization from a username/API-key pair.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Builds the `Authorization` header value for a Kobiton account.
///
/// The credentials are joined as `username:api_key` and encoded with the
/// standard base64 alphabet without line wrapping, so the result is always
/// a single header-safe line.
pub fn basic_authorization(username: &str, api_key: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{api_key}"));
    format!("Basic {encoded}")
}
