//! Compact bearer token issued by the authentication endpoint
//!
//! The token is a `header.payload.signature` string. Only the payload is
//! decoded; the signature is the server's business.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::ApiError;

/// Claims carried in the token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Not valid before (epoch seconds)
    #[serde(rename = "nbf", default)]
    pub not_before: i64,

    /// Issued at (epoch seconds)
    #[serde(rename = "iat", default)]
    pub issued_at: i64,

    /// Expires at (epoch seconds)
    #[serde(rename = "exp", default)]
    pub expires: i64,

    /// Token only grants read access
    #[serde(rename = "ro", default)]
    pub read_only: bool,

    /// Token is usable from any IP address
    #[serde(rename = "gk", default)]
    pub global_key: bool,
}

/// Immutable bearer token.
///
/// A token whose payload could not be decoded reports itself as expired,
/// read-only and global-key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    raw: String,
    claims: Option<TokenClaims>,
}

impl Token {
    /// Decode a compact token, failing on malformed input.
    pub fn decode(raw: impl Into<String>) -> Result<Self, ApiError> {
        let raw = raw.into();
        let claims = decode_claims(&raw)?;
        Ok(Self {
            raw,
            claims: Some(claims),
        })
    }

    /// Wrap a raw string without failing. Undecodable payloads yield a
    /// token with no claims.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let claims = decode_claims(&raw).ok();
        Self { raw, claims }
    }

    /// Decoded claims, if the payload was readable
    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }

    /// True when `exp` is at or before the current time
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Expiry check against an explicit clock value (epoch seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.claims {
            Some(claims) => claims.expires <= now,
            None => true,
        }
    }

    pub fn read_only(&self) -> bool {
        self.claims.is_none_or(|c| c.read_only)
    }

    pub fn global_key(&self) -> bool {
        self.claims.is_none_or(|c| c.global_key)
    }

    /// Expiry as a timestamp, for display
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .and_then(|c| DateTime::from_timestamp(c.expires, 0))
    }

    /// The compact string form, exactly as received
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn decode_claims(raw: &str) -> Result<TokenClaims, ApiError> {
    let parts: Vec<&str> = raw.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(ApiError::InvalidToken(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| ApiError::InvalidToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&payload)
        .map_err(|e| ApiError::InvalidToken(format!("payload is not valid JSON: {e}")))
}
