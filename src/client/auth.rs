//! Token exchange with the `auth` endpoint
//!
//! The request body is signed with the account's RSA key (PKCS#1 v1.5 over
//! SHA-512). The digest is computed while the body is serialized, so the
//! signature covers exactly the bytes that are sent.

use std::io::{self, Write};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use super::transport::{ApiRequest, AuthorizingTransport, RequestOptions, TokenFetcher};
use crate::config::{AuthConfig, ExpirationTime};
use crate::error::{ApiError, Result};

const AUTH_PATH: &str = "auth";

const SIGNATURE_HEADER: HeaderName = HeaderName::from_static("signature");

/// Body of the authentication request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    pub login: String,
    pub nonce: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub read_only: bool,
    pub expiration_time: ExpirationTime,
    pub global_key: bool,
}

impl AuthRequest {
    /// Build from configuration, filling in a random nonce and label and a
    /// one day lifetime where the configuration has none
    pub fn from_config(config: &dyn AuthConfig) -> Self {
        Self {
            login: config.login().to_string(),
            nonce: config.nonce().unwrap_or_else(|| random_hex(8)),
            label: config
                .label()
                .unwrap_or_else(|| format!("transip-dns client - {}", random_hex(4))),
            read_only: config.read_only(),
            expiration_time: config.expiration_time().unwrap_or_default(),
            global_key: config.global_key(),
        }
    }

    /// Serialize and sign in one pass
    pub fn sign(&self, key: &RsaPrivateKey) -> Result<SignedRequest> {
        let mut writer = DigestWriter::default();
        serde_json::to_writer(&mut writer, self)?;
        let (body, digest) = writer.finish();

        let signature = key
            .sign(Pkcs1v15Sign::new::<Sha512>(), &digest)
            .map_err(|e| ApiError::Signing(e.to_string()))?;

        Ok(SignedRequest {
            body,
            signature: STANDARD.encode(signature),
        })
    }
}

/// Serialized body plus its base64 signature
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub body: Vec<u8>,
    pub signature: String,
}

/// Buffers written bytes and hashes them at the same time
#[derive(Default)]
struct DigestWriter {
    hasher: Sha512,
    buf: Vec<u8>,
}

impl DigestWriter {
    fn finish(self) -> (Vec<u8>, Vec<u8>) {
        (self.buf, self.hasher.finalize().to_vec())
    }
}

impl Write for DigestWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.hasher.update(data);
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

/// Exchanges a signed [`AuthRequest`] for a token
#[derive(Debug, Default, Clone, Copy)]
pub struct Authenticator;

impl Authenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenFetcher for Authenticator {
    async fn fetch_token(
        &self,
        transport: &AuthorizingTransport,
        options: &RequestOptions,
    ) -> Result<String> {
        let config = transport.config();
        let payload = AuthRequest::from_config(config);
        let signed = payload.sign(&config.private_key()?)?;

        let signature = HeaderValue::from_str(&signed.signature)
            .map_err(|e| ApiError::Signing(e.to_string()))?;
        let request = ApiRequest::new(Method::POST, AUTH_PATH)
            .body(&signed.body)
            .header(SIGNATURE_HEADER, signature);

        log::debug!(
            "Authenticating {} (read_only: {}, global_key: {}, expiration: {})",
            payload.login,
            payload.read_only,
            payload.global_key,
            payload.expiration_time
        );

        let response = transport
            .execute(request, &options.unauthenticated())
            .await?;

        if !response.is_success() {
            return Err(response.error().into());
        }

        let data: TokenResponse = response.decode()?;
        if data.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "authentication response carried no token".to_string(),
            )
            .into());
        }

        Ok(data.token)
    }
}

/// Hex string of `size` random bytes.
///
/// Uses the OS generator; only if that fails does it fall back to a
/// generator seeded from the clock and process id.
pub(crate) fn random_hex(size: usize) -> String {
    let mut buf = vec![0u8; size];

    if let Err(e) = OsRng.try_fill_bytes(&mut buf) {
        log::warn!("OS random source unavailable ({e}), using fallback generator");
        StdRng::seed_from_u64(fallback_seed()).fill_bytes(&mut buf);
    }

    hex::encode(buf)
}

fn fallback_seed() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ (u64::from(std::process::id()) << 32)
}
