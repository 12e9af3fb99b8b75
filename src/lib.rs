//! TransIP DNS client
//!
//! Authenticates against the TransIP REST API with a signed key exchange,
//! caches the bearer token, and reads or rewrites DNS zones either one
//! record at a time or by replacing the whole zone.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod store;

pub use client::{RequestOptions, TransipClient, ZoneClient, ZoneControlMode};
pub use config::{AuthConfig, ExpirationTime, ProviderConfig};
pub use error::{ApiError, ConfigError, Error, Result, StoreError};
pub use provider::{ChangeList, ChangeState, Provider, Record, RecordProvider};
