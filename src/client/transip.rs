//! TransIP API client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use super::auth::Authenticator;
use super::buf::BufferPool;
use super::models::{
    DnsEntries, DnsEntry, DnsEntryEnvelope, Domain, DomainsResponse, PingResponse,
};
use super::transport::{
    ApiRequest, AuthorizingTransport, RequestOptions, ReqwestRoundTrip, RoundTrip, WireResponse,
};
use super::{ZoneClient, ZoneControlMode};
use crate::config::AuthConfig;
use crate::error::{ApiError, Result};
use crate::provider::{ChangeList, ChangeState, Record};
use crate::store::TokenStore;

/// TransIP API client
pub struct TransipClient {
    transport: AuthorizingTransport,
    pool: BufferPool,
    mode: ZoneControlMode,
}

impl TransipClient {
    /// Client talking HTTP through reqwest
    pub fn new(
        config: Arc<dyn AuthConfig>,
        store: Arc<dyn TokenStore>,
        mode: ZoneControlMode,
    ) -> Result<Self> {
        let inner: Arc<dyn RoundTrip> = Arc::new(ReqwestRoundTrip::new()?);
        let transport =
            AuthorizingTransport::new(inner, config, store, Arc::new(Authenticator::new()));
        Ok(Self::with_transport(transport, mode))
    }

    pub fn with_transport(transport: AuthorizingTransport, mode: ZoneControlMode) -> Self {
        Self {
            transport,
            pool: BufferPool::new(),
            mode,
        }
    }

    pub fn transport(&self) -> &AuthorizingTransport {
        &self.transport
    }

    pub fn mode(&self) -> ZoneControlMode {
        self.mode
    }

    /// Call an endpoint and decode its JSON answer
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
        options: &RequestOptions,
    ) -> Result<T> {
        let response = self.send(method, path, body, options).await?;
        Ok(response.decode()?)
    }

    /// Call an endpoint and check the answer.
    ///
    /// Success means 2xx with a JSON content type; 204 may come without
    /// one. Other statuses become errors carrying the status code.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
        options: &RequestOptions,
    ) -> Result<WireResponse> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;

        let response = self.transport.execute(request, options).await?;

        if !response.is_success() {
            return Err(response.error().into());
        }

        if !response.is_json() && response.status != StatusCode::NO_CONTENT {
            return Err(ApiError::UnexpectedContentType(response.content_type().to_string()).into());
        }

        Ok(response)
    }

    /// Current DNS entries of a zone
    pub async fn list_entries(&self, zone: &str, options: &RequestOptions) -> Result<Vec<DnsEntry>> {
        let data: DnsEntries = self
            .fetch(Method::GET, &dns_path(zone), None, options)
            .await?;
        Ok(data.entries)
    }

    /// Push a change list using the given strategy
    pub async fn apply_changes(
        &self,
        zone: &str,
        changes: &ChangeList,
        mode: ZoneControlMode,
        options: &RequestOptions,
    ) -> Result<()> {
        match mode {
            ZoneControlMode::FullZone => self.replace_zone(zone, changes, options).await,
            ZoneControlMode::RecordLevel => {
                self.mutate(zone, changes, ChangeState::DELETE, options).await?;
                self.mutate(zone, changes, ChangeState::UPDATE, options).await?;
                self.mutate(zone, changes, ChangeState::CREATE, options).await
            }
        }
    }

    /// PUT the complete desired entry set in one call
    async fn replace_zone(
        &self,
        zone: &str,
        changes: &ChangeList,
        options: &RequestOptions,
    ) -> Result<()> {
        let data = DnsEntries {
            entries: changes
                .iter(ChangeState::NO_CHANGE | ChangeState::CREATE | ChangeState::UPDATE)
                .map(|(record, _)| DnsEntry::from_record(record, zone))
                .collect(),
        };

        let mut buf = self.pool.acquire();
        serde_json::to_writer(&mut *buf, &data)?;

        log::debug!("Replacing zone {} with {} entries", zone, data.entries.len());
        self.send(Method::PUT, &dns_path(zone), Some(buf.as_slice()), options)
            .await?;
        Ok(())
    }

    /// One call per record in `state`
    async fn mutate(
        &self,
        zone: &str,
        changes: &ChangeList,
        state: ChangeState,
        options: &RequestOptions,
    ) -> Result<()> {
        let method = if state == ChangeState::DELETE {
            Method::DELETE
        } else if state == ChangeState::CREATE {
            Method::POST
        } else {
            Method::PATCH
        };

        let path = dns_path(zone);
        let mut buf = self.pool.acquire();

        for (record, _) in changes.iter(state) {
            let envelope = DnsEntryEnvelope {
                entry: DnsEntry::from_record(record, zone),
            };
            serde_json::to_writer(&mut *buf, &envelope)?;

            log::debug!("{} {} in {}", method, record, zone);
            self.send(method.clone(), &path, Some(buf.as_slice()), options)
                .await?;
            buf.clear();
        }

        Ok(())
    }

    /// Domains on the account
    pub async fn list_domains(&self, options: &RequestOptions) -> Result<Vec<Domain>> {
        let data: DomainsResponse = self.fetch(Method::GET, "domains", None, options).await?;
        Ok(data.domains)
    }

    /// Health check against `api-test`
    pub async fn ping(&self, options: &RequestOptions) -> Result<()> {
        let data: PingResponse = self.fetch(Method::GET, "api-test", None, options).await?;

        if data.ping != "pong" {
            return Err(ApiError::InvalidResponse(format!(
                "expected ping response 'pong', got '{}'",
                data.ping
            ))
            .into());
        }

        Ok(())
    }
}

#[async_trait]
impl ZoneClient for TransipClient {
    async fn get_records(&self, zone: &str, options: &RequestOptions) -> Result<Vec<Record>> {
        Ok(self
            .list_entries(zone, options)
            .await?
            .into_iter()
            .map(|entry| entry.into_record(zone))
            .collect())
    }

    async fn set_records(
        &self,
        zone: &str,
        changes: &ChangeList,
        options: &RequestOptions,
    ) -> Result<()> {
        self.apply_changes(zone, changes, self.mode, options).await
    }

    async fn list_zones(&self, options: &RequestOptions) -> Result<Vec<Domain>> {
        self.list_domains(options).await
    }
}

/// `domains/{zone}/dns`, zone without trailing dot, path-escaped
fn dns_path(zone: &str) -> String {
    format!(
        "domains/{}/dns",
        urlencoding::encode(zone.trim_end_matches('.'))
    )
}
