//! Record-level provider facade
//!
//! [`Provider`] turns record operations into change lists and hands them to
//! a [`ZoneClient`]. Every mutating call holds an exclusive lock across its
//! read-modify-write, so calls from one process never interleave. Other
//! processes editing the same zone are not coordinated with.

pub mod changes;
pub mod record;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{Domain, RequestOptions, TransipClient, ZoneClient};
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::store::open_store;

pub use changes::{ChangeList, ChangeState, append_changes, delete_changes, set_changes};
pub use record::{Record, absolute_name, relative_name};

/// Record operations on the zones of one account
#[async_trait]
pub trait RecordProvider: Send + Sync {
    async fn get_records(&self, zone: &str, options: &RequestOptions) -> Result<Vec<Record>>;

    /// Add records that are not present yet; returns the added ones
    async fn append_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>>;

    /// Make each `(name, type)` set in `records` match exactly; returns the
    /// records that were written
    async fn set_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>>;

    /// Remove matching records; returns the removed ones
    async fn delete_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>>;

    async fn list_zones(&self, options: &RequestOptions) -> Result<Vec<Domain>>;
}

/// Provider facade over a zone client
pub struct Provider<C = TransipClient> {
    client: C,
    lock: RwLock<()>,
}

impl Provider<TransipClient> {
    /// Build the HTTP client, token store and transport from settings
    pub fn from_config(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let store = open_store(&config.store_location());
        let mode = config.client_control_mode;
        log::debug!(
            "Provider for {} using {} control",
            config.login,
            mode.as_str()
        );

        let client = TransipClient::new(Arc::new(config), store, mode)?;
        Ok(Self::new(client))
    }

    /// Health check
    pub async fn ping(&self, options: &RequestOptions) -> Result<()> {
        let _guard = self.lock.read().await;
        self.client.ping(options).await
    }
}

impl<C: ZoneClient> Provider<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            lock: RwLock::new(()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn apply<F>(
        &self,
        zone: &str,
        records: &[Record],
        mask: ChangeState,
        options: &RequestOptions,
        compute: F,
    ) -> Result<Vec<Record>>
    where
        F: FnOnce(&[Record], &[Record]) -> ChangeList + Send,
    {
        let _guard = self.lock.write().await;

        let input: Vec<Record> = records.iter().map(|r| r.relative_to(zone)).collect();
        let current = self.client.get_records(zone, options).await?;
        let changes = compute(&current, &input);

        if changes.is_noop() {
            log::debug!("No changes for {zone}");
            return Ok(Vec::new());
        }

        self.client.set_records(zone, &changes, options).await?;
        Ok(changes.records(mask))
    }
}

#[async_trait]
impl<C: ZoneClient> RecordProvider for Provider<C> {
    async fn get_records(&self, zone: &str, options: &RequestOptions) -> Result<Vec<Record>> {
        let _guard = self.lock.read().await;
        self.client.get_records(zone, options).await
    }

    async fn append_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>> {
        self.apply(zone, records, ChangeState::CREATE, options, append_changes)
            .await
    }

    async fn set_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>> {
        self.apply(
            zone,
            records,
            ChangeState::CREATE | ChangeState::UPDATE,
            options,
            set_changes,
        )
        .await
    }

    async fn delete_records(
        &self,
        zone: &str,
        records: &[Record],
        options: &RequestOptions,
    ) -> Result<Vec<Record>> {
        self.apply(zone, records, ChangeState::DELETE, options, delete_changes)
            .await
    }

    async fn list_zones(&self, options: &RequestOptions) -> Result<Vec<Domain>> {
        let _guard = self.lock.read().await;
        self.client.list_zones(options).await
    }
}
