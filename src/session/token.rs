//! Client-side token decoding.
//!
//! TRUST
//! =====
//! Claims are read from the payload segment without checking the signature.
//! They are display data only: nothing in this crate makes an authorization
//! decision from them, and neither should callers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Compact form needs at least `header.payload`.
    #[error("token must have at least 2 dot-separated segments, found {found}")]
    SegmentCount { found: usize },
    #[error("token payload is empty")]
    EmptyPayload,
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Decoded (unverified) token claims.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The `sub` claim. Numeric subjects (common with mock APIs) are rendered
    /// as strings.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        match self.0.get("sub")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_claim("name")
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_claim("email")
    }

    /// The `exp` claim in seconds since the epoch. Not enforced anywhere.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.0.get("iat").and_then(Value::as_i64)
    }

    fn str_claim(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decode the claims carried by a compact JWT without verifying it.
///
/// Only the second segment is read, so anything after it (normally the
/// signature) is ignored. The payload may use the URL-safe or the standard
/// base64 alphabet, padded or not.
///
/// # Errors
///
/// Returns a [`TokenError`] if the token has no payload segment, the payload
/// is not base64, or it does not hold a JSON object.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() < 2 {
        return Err(TokenError::SegmentCount { found: segments.len() });
    }

    // The no-pad URL-safe engine rejects `=` and the standard alphabet.
    let payload: String = segments[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    if payload.is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    let bytes = URL_SAFE_NO_PAD.decode(&payload)?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => Ok(Claims(map)),
        _ => Err(TokenError::NotAnObject),
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
