//! Authorizing HTTP transport
//!
//! Every API call goes through [`AuthorizingTransport::execute`], which
//! attaches a bearer token (fetching and caching one when needed), resolves
//! the path against the base URI and retries once with a fresh token when
//! the server answers 401.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::debug::DebugSink;
use super::models::ErrorResponse;
use super::token::Token;
use crate::config::AuthConfig;
use crate::error::{ApiError, ConfigError, Result};
use crate::store::TokenStore;

const JSON: &str = "application/json";

/// Default per-request timeout of the reqwest client
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-call flags threaded through the transport
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Send without a bearer token (the auth exchange itself)
    pub skip_auth: bool,
    /// Ignore any cached token and authenticate again
    pub force_refresh: bool,
    pub cancel: Option<CancellationToken>,
    /// Limit for each network round trip
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Same cancellation and timeout, without authorization
    pub fn unauthenticated(&self) -> Self {
        Self {
            skip_auth: true,
            force_refresh: false,
            ..self.clone()
        }
    }

    fn refreshing(&self) -> Self {
        Self {
            force_refresh: true,
            ..self.clone()
        }
    }
}

/// Request as handed to the transport, path still relative
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub headers: HeaderMap,
    pub body: Option<&'a [u8]>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn body(mut self, body: &'a [u8]) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Fully resolved request on its way to the network
#[derive(Debug)]
pub struct WireRequest<'a> {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<&'a [u8]>,
}

/// Buffered response
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl WireResponse {
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn is_json(&self) -> bool {
        self.content_type()
            .trim_start()
            .to_ascii_lowercase()
            .starts_with(JSON)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the JSON body
    pub fn decode<T: DeserializeOwned>(&self) -> std::result::Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {e}. Body was: {}", self.text()))
        })
    }

    /// Error for a non-2xx response, keeping the status code.
    ///
    /// The message comes from the `{"error": ...}` envelope, else the raw
    /// body, else the status reason.
    pub fn error(&self) -> ApiError {
        let message = serde_json::from_slice::<ErrorResponse>(&self.body)
            .ok()
            .map(|e| e.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let text = self.text().trim().to_string();
                if text.is_empty() {
                    self.status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    text
                }
            });

        if self.status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status {
                status: self.status.as_u16(),
                message,
            }
        }
    }
}

/// One HTTP exchange. The seam below the authorizing layer.
#[async_trait]
pub trait RoundTrip: Send + Sync {
    async fn round_trip(&self, request: WireRequest<'_>) -> std::result::Result<WireResponse, ApiError>;
}

/// Produces a raw compact token for the transport's configuration
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(
        &self,
        transport: &AuthorizingTransport,
        options: &RequestOptions,
    ) -> Result<String>;
}

/// [`RoundTrip`] over a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestRoundTrip {
    http: reqwest::Client,
}

impl ReqwestRoundTrip {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("transip-dns/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RoundTrip for ReqwestRoundTrip {
    async fn round_trip(&self, request: WireRequest<'_>) -> std::result::Result<WireResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}

/// Transport that keeps requests authorized
pub struct AuthorizingTransport {
    inner: Arc<dyn RoundTrip>,
    config: Arc<dyn AuthConfig>,
    store: Arc<dyn TokenStore>,
    fetcher: Arc<dyn TokenFetcher>,
    base: Option<Url>,
    debug: Option<DebugSink>,
}

impl AuthorizingTransport {
    pub fn new(
        inner: Arc<dyn RoundTrip>,
        config: Arc<dyn AuthConfig>,
        store: Arc<dyn TokenStore>,
        fetcher: Arc<dyn TokenFetcher>,
    ) -> Self {
        let base = config.base_uri();
        let debug = config.debug();
        Self {
            inner,
            config,
            store,
            fetcher,
            base,
            debug,
        }
    }

    pub fn config(&self) -> &dyn AuthConfig {
        self.config.as_ref()
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Token currently cached for this configuration, expired or not
    pub fn cached_token(&self) -> Result<Option<Token>> {
        Ok(self.store.get(&self.config.storage_key())?)
    }

    /// Absolute URL for a request path
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let resolved = match &self.base {
            Some(base) => base.join(path),
            None => Url::parse(path),
        };
        resolved.map_err(|e| {
            ConfigError::Invalid(format!("cannot resolve request path '{path}': {e}")).into()
        })
    }

    /// Send a request, retrying once with a fresh token on 401.
    ///
    /// The returned response may still carry any status; only transport
    /// failures, cancellation and token acquisition errors are `Err`.
    pub fn execute<'a>(
        &'a self,
        request: ApiRequest<'a>,
        options: &'a RequestOptions,
    ) -> BoxFuture<'a, Result<WireResponse>> {
        Box::pin(async move {
            let mut headers = request.headers.clone();

            if !options.skip_auth {
                let token = self.token(options).await?;
                let bearer = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ApiError::InvalidToken("token is not a valid header value".into()))?;
                headers.insert(AUTHORIZATION, bearer);
            }

            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
            headers.insert(ACCEPT, HeaderValue::from_static(JSON));

            let wire = WireRequest {
                method: request.method.clone(),
                url: self.resolve(request.path)?,
                headers,
                body: request.body,
            };
            let line = format!("{} {}", wire.method, wire.url);
            log::debug!("{line}");

            if let Some(sink) = &self.debug {
                sink.dump_request(&wire);
            }

            let response = with_deadline(options, self.inner.round_trip(wire)).await?;
            log::debug!("{line} -> {}", response.status);

            if let Some(sink) = &self.debug {
                sink.dump_response(&response);
            }

            if response.status == StatusCode::UNAUTHORIZED
                && !options.skip_auth
                && !options.force_refresh
            {
                log::warn!("{line} was rejected with 401, refreshing token and retrying once");
                let retry = options.refreshing();
                return self.execute(request, &retry).await;
            }

            Ok(response)
        })
    }

    /// Cached token when usable, otherwise a freshly fetched and stored one
    async fn token(&self, options: &RequestOptions) -> Result<Token> {
        let key = self.config.storage_key();

        if options.force_refresh {
            log::debug!("Forced token refresh");
        } else {
            match self.store.get(&key)? {
                Some(token) if !token.is_expired() => {
                    log::debug!("Using cached token");
                    return Ok(token);
                }
                Some(_) => log::debug!("Cached token expired"),
                None => log::debug!("No cached token"),
            }
        }

        let raw = self
            .fetcher
            .fetch_token(self, &options.unauthenticated())
            .await?;
        let token = Token::decode(raw)?;
        self.store.set(&key, &token)?;

        match token.expires_at() {
            Some(expires) => log::info!("Obtained new API token, valid until {expires}"),
            None => log::info!("Obtained new API token"),
        }

        Ok(token)
    }
}

/// Race a network call against the caller's cancellation token and timeout
async fn with_deadline<T>(
    options: &RequestOptions,
    call: impl Future<Output = std::result::Result<T, ApiError>>,
) -> Result<T> {
    let limited = async {
        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(ApiError::Timeout)),
            None => call.await,
        }
    };

    let outcome = match &options.cancel {
        Some(cancel) => {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ApiError::Cancelled),
                result = limited => result,
            }
        }
        None => limited.await,
    };

    Ok(outcome?)
}
