//! TransIP API client
//!
//! Layers, bottom up: [`token`] decoding, the [`auth`] exchange, the
//! [`transport`] that attaches and refreshes bearer tokens, and the
//! [`TransipClient`] operations on domains and DNS entries.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::Result;
use crate::provider::{ChangeList, Record};

pub mod auth;
pub mod buf;
pub mod debug;
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod token;
pub mod transip;
pub mod transport;

pub use auth::{AuthRequest, Authenticator};
pub use buf::BufferPool;
pub use debug::{DebugLevel, DebugSink};
#[cfg(test)]
pub use mock::MockZoneClient;
pub use models::{DnsEntry, Domain};
pub use token::{Token, TokenClaims};
pub use transip::TransipClient;
pub use transport::{AuthorizingTransport, RequestOptions, ReqwestRoundTrip, RoundTrip};

/// Zone operations the provider facade builds on
#[async_trait]
pub trait ZoneClient: Send + Sync {
    /// Current records of a zone, with zone-relative names
    async fn get_records(&self, zone: &str, options: &RequestOptions) -> Result<Vec<Record>>;

    /// Push a computed change list to the zone
    async fn set_records(
        &self,
        zone: &str,
        changes: &ChangeList,
        options: &RequestOptions,
    ) -> Result<()>;

    /// Domains on the account
    async fn list_zones(&self, options: &RequestOptions) -> Result<Vec<Domain>>;
}

/// How zone changes are pushed to the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZoneControlMode {
    /// One request per changed record
    #[default]
    RecordLevel,
    /// Replace the whole zone in one request. Concurrent edits by other
    /// clients between read and write are lost.
    FullZone,
}

static FULL_ZONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)full[_\s-]?zone(?:[_\s-]?control)?").expect("FULL_ZONE_REGEX should compile")
});

static RECORD_LEVEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*record[_\s-]?level(?:[_\s-]?control)?\s*$")
        .expect("RECORD_LEVEL_REGEX should compile")
});

impl ZoneControlMode {
    /// Numeric form: `1` is full zone, anything else record level
    pub fn from_int(value: i64) -> Self {
        if value == 1 {
            ZoneControlMode::FullZone
        } else {
            ZoneControlMode::RecordLevel
        }
    }

    /// Permissive text form. Unrecognised text falls back to record level
    /// with a warning.
    pub fn from_text(value: &str) -> Self {
        if FULL_ZONE_REGEX.is_match(value) {
            return ZoneControlMode::FullZone;
        }

        if !value.trim().is_empty() && !RECORD_LEVEL_REGEX.is_match(value) {
            log::warn!(
                "Unrecognised zone control mode '{value}', using record level control"
            );
        }

        ZoneControlMode::RecordLevel
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneControlMode::RecordLevel => "record level",
            ZoneControlMode::FullZone => "full zone",
        }
    }
}

impl FromStr for ZoneControlMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(n) => Ok(Self::from_int(n)),
            Err(_) => Ok(Self::from_text(s)),
        }
    }
}

impl<'de> Deserialize<'de> for ZoneControlMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self::from_int(n),
            Raw::Text(s) => Self::from_text(&s),
            Raw::Null(()) => Self::default(),
        })
    }
}
