//! Wire types of the TransIP REST API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::provider::record::{Record, relative_name};

/// TTL values the API accepts for `expire`
pub const ALLOWED_TTLS: [u64; 6] = [60, 300, 3600, 14400, 28800, 86400];

/// Used for any TTL not in [`ALLOWED_TTLS`]
pub const FALLBACK_TTL: u64 = 3600;

/// One DNS entry as the API sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsEntry {
    #[serde(rename = "type")]
    pub entry_type: String,

    pub name: String,

    pub content: String,

    /// TTL in seconds
    pub expire: u64,
}

impl DnsEntry {
    /// Wire form of a record: relative name, coerced TTL
    pub fn from_record(record: &Record, zone: &str) -> Self {
        Self {
            entry_type: record.record_type.clone(),
            name: relative_name(&record.name, zone),
            content: record.data.clone(),
            expire: coerce_ttl(record.ttl),
        }
    }

    pub fn into_record(self, zone: &str) -> Record {
        Record {
            name: relative_name(&self.name, zone),
            record_type: self.entry_type,
            data: self.content,
            ttl: Duration::from_secs(self.expire),
        }
    }
}

/// Allowed TTLs pass through, everything else becomes one hour
pub fn coerce_ttl(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() == 0 && ALLOWED_TTLS.contains(&secs) {
        secs
    } else {
        FALLBACK_TTL
    }
}

/// `{"dnsEntries": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsEntries {
    #[serde(rename = "dnsEntries", default)]
    pub entries: Vec<DnsEntry>,
}

/// `{"dnsEntry": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsEntryEnvelope {
    #[serde(rename = "dnsEntry")]
    pub entry: DnsEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainsResponse {
    #[serde(default)]
    pub domains: Vec<Domain>,

    #[serde(rename = "_links", default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub ping: String,
}

/// Error envelope of non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
