//! BingX credentials and request signing.
//!
//! Signed endpoints take a `timestamp` parameter plus a `signature`
//! parameter: the lowercase hex HMAC-SHA256 of the canonical query string,
//! keyed by the secret key. The canonical string is every parameter as
//! `key=value`, sorted by key in byte order and joined with `&`. The exchange
//! recomputes it the same way, so any other ordering fails verification.
//!
//! Values are signed raw and URL-encoded only for transmission, which is what
//! the exchange verifies against (`[`, `{`, and spaces in batch payloads).

use bx_core::error::BxError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::request::Params;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "X-BX-APIKEY";

/// Values that are template leftovers rather than real keys.
const PLACEHOLDERS: &[&str] = &[
    "YOUR_API_KEY_HERE",
    "YOUR_SECRET_KEY_HERE",
    "YOUR_API_KEY",
    "YOUR_SECRET_KEY",
    "YOUR_API_SECRET",
    "API_KEY",
    "SECRET_KEY",
    "<API_KEY>",
    "<SECRET_KEY>",
    "CHANGEME",
];

/// API key and secret, fixed for the lifetime of a client.
///
/// The secret is wrapped in `SecretString`: it never shows up in `Debug`
/// output and is zeroed on drop.
pub struct Credentials {
    api_key: String,
    secret_key: SecretString,
}

impl Credentials {
    pub fn new(api_key: &str, secret_key: &str) -> Self {
        Self { api_key: api_key.to_string(), secret_key: SecretString::from(secret_key.to_string()) }
    }

    /// Reject empty and placeholder values.
    pub fn validate(&self) -> Result<(), BxError> {
        check_value("API key", &self.api_key)?;
        check_value("secret key", self.secret_key.expose_secret())
    }

    /// API key (header value). Log only through [`bx_core::mask_key`].
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a complete parameter set with this secret.
    pub fn sign(&self, params: &Params) -> String {
        sign(params, self.secret_key.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &bx_core::mask_key(&self.api_key))
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

fn check_value(what: &str, value: &str) -> Result<(), BxError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BxError::Configuration(format!("{what} is empty")));
    }
    if is_placeholder(trimmed) {
        return Err(BxError::Configuration(format!("{what} is a placeholder value")));
    }
    Ok(())
}

/// Whether `value` is one of the known template sentinels (case-insensitive).
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    PLACEHOLDERS.iter().any(|p| p.eq_ignore_ascii_case(value))
}

/// Compute an HMAC-SHA256 signature and return it as a lowercase hex string.
///
/// # Arguments
///
/// * `secret`: the API secret key (UTF-8 string).
/// * `message`: the data to sign (the canonical query string).
pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Canonical string: `k=v` pairs sorted by key (byte order), joined by `&`.
pub fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign a parameter set that already holds every transmitted parameter,
/// `timestamp` included.
///
/// Pure: no I/O, no state. Output is always 64 lowercase hex characters.
pub fn sign(params: &Params, secret: &str) -> String {
    hmac_sha256_hex(secret, &canonical_query(params))
}

/// URL-encoded query in canonical order, with `signature` appended last when
/// given.
pub fn encode_query(params: &Params, signature: Option<&str>) -> String {
    let mut parts: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    if let Some(sig) = signature {
        parts.push(format!("signature={sig}"));
    }
    parts.join("&")
}
