//! Mock zone client for testing
//!
//! Holds zones in memory and applies change lists to them, so the provider
//! facade can be tested without any HTTP.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::models::Domain;
use super::transport::RequestOptions;
use super::ZoneClient;
use crate::error::{ApiError, Result};
use crate::provider::{ChangeList, ChangeState, Record};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockZoneClient::new()
///     .with_zone("example.com", vec![record("www", "A", "192.0.2.1", 300)])
///     .await;
/// let records = mock.get_records("example.com", &RequestOptions::new()).await?;
/// ```
#[derive(Default)]
pub struct MockZoneClient {
    zones: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    applied: Arc<Mutex<Vec<ChangeList>>>,
    fail_with: Arc<Mutex<Option<u16>>>,
}

impl MockZoneClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a zone
    pub async fn with_zone(self, zone: &str, records: Vec<Record>) -> Self {
        self.zones.lock().await.insert(zone_key(zone), records);
        self
    }

    /// Make every call fail with this HTTP status
    pub async fn fail_with(&self, status: u16) {
        *self.fail_with.lock().await = Some(status);
    }

    /// Change lists received by `set_records`, in order
    pub async fn applied(&self) -> Vec<ChangeList> {
        self.applied.lock().await.clone()
    }

    pub async fn records(&self, zone: &str) -> Vec<Record> {
        self.zones
            .lock()
            .await
            .get(&zone_key(zone))
            .cloned()
            .unwrap_or_default()
    }

    async fn check_failure(&self) -> Result<()> {
        match *self.fail_with.lock().await {
            Some(status) => Err(ApiError::Status {
                status,
                message: "mock failure".to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

fn zone_key(zone: &str) -> String {
    zone.trim_end_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl ZoneClient for MockZoneClient {
    async fn get_records(&self, zone: &str, _options: &RequestOptions) -> Result<Vec<Record>> {
        self.check_failure().await?;
        Ok(self.records(zone).await)
    }

    async fn set_records(
        &self,
        zone: &str,
        changes: &ChangeList,
        _options: &RequestOptions,
    ) -> Result<()> {
        self.check_failure().await?;
        self.applied.lock().await.push(changes.clone());

        let kept = changes.records(ChangeState::NO_CHANGE | ChangeState::CREATE | ChangeState::UPDATE);
        let mut zones = self.zones.lock().await;
        let current = zones.entry(zone_key(zone)).or_default();
        // Updates replace the record of the same name and type.
        let updated = changes.records(ChangeState::UPDATE);
        current.retain(|r| !updated.iter().any(|u| u.same_rrset(r)));
        current.retain(|r| kept.iter().any(|k| k.same_identity(r)));
        for record in kept {
            if !current.iter().any(|c| c.same_identity(&record)) {
                current.push(record);
            }
        }

        Ok(())
    }

    async fn list_zones(&self, _options: &RequestOptions) -> Result<Vec<Domain>> {
        self.check_failure().await?;
        let mut names: Vec<String> = self.zones.lock().await.keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(|name| Domain { name }).collect())
    }
}
