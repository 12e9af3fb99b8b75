//! Configuration for the TransIP client
//!
//! [`AuthConfig`] is what the authenticator and transport need to know about
//! an account. [`ProviderConfig`] implements it from a YAML file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::Url;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;

use crate::client::ZoneControlMode;
use crate::client::debug::{DebugLevel, DebugSink};
use crate::error::{ConfigError, Result};
use crate::store::{StoreLocation, storage_key};

/// Default API endpoint
pub const DEFAULT_BASE_URI: &str = "https://api.transip.nl/v6/";

/// Token lifetimes accepted by the authentication endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationTime {
    #[serde(rename = "1 hour")]
    OneHour,
    #[serde(rename = "120 minutes")]
    TwoHours,
    #[serde(rename = "48 hours")]
    FortyEightHours,
    #[default]
    #[serde(rename = "1 day")]
    OneDay,
    #[serde(rename = "15 days")]
    FifteenDays,
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "4 weeks")]
    FourWeeks,
}

impl ExpirationTime {
    pub const ALL: [ExpirationTime; 7] = [
        ExpirationTime::OneHour,
        ExpirationTime::TwoHours,
        ExpirationTime::FortyEightHours,
        ExpirationTime::OneDay,
        ExpirationTime::FifteenDays,
        ExpirationTime::OneWeek,
        ExpirationTime::FourWeeks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationTime::OneHour => "1 hour",
            ExpirationTime::TwoHours => "120 minutes",
            ExpirationTime::FortyEightHours => "48 hours",
            ExpirationTime::OneDay => "1 day",
            ExpirationTime::FifteenDays => "15 days",
            ExpirationTime::OneWeek => "1 week",
            ExpirationTime::FourWeeks => "4 weeks",
        }
    }
}

impl fmt::Display for ExpirationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpirationTime {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s.trim())
            .ok_or_else(|| ConfigError::Invalid(format!("unsupported expiration time '{s}'")))
    }
}

/// Account identity and scope used to obtain tokens.
///
/// `label`, `nonce` and `expiration_time` return `None` to let the
/// authenticator pick its defaults.
pub trait AuthConfig: Send + Sync {
    fn login(&self) -> &str;

    fn read_only(&self) -> bool;

    fn global_key(&self) -> bool;

    fn private_key(&self) -> Result<RsaPrivateKey>;

    /// Base every request path is resolved against
    fn base_uri(&self) -> Option<Url>;

    /// Key under which tokens for this identity and scope are cached
    fn storage_key(&self) -> String {
        storage_key(self.login(), self.global_key(), self.read_only())
    }

    fn label(&self) -> Option<String> {
        None
    }

    fn nonce(&self) -> Option<String> {
        None
    }

    fn expiration_time(&self) -> Option<ExpirationTime> {
        None
    }

    fn debug(&self) -> Option<DebugSink> {
        None
    }
}

/// Provider settings as read from the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// TransIP account name
    pub login: String,

    /// Request tokens that can only read
    pub read_only: bool,

    /// Request tokens restricted to the account's IP whitelist
    pub not_global_key: bool,

    pub expiration_time: Option<ExpirationTime>,

    /// Inline PEM text or a path to a PEM file
    pub private_key: String,

    pub base_uri: Option<String>,

    /// `memory`, a directory path, or empty for `<tmp>/transip`
    pub token_storage: String,

    pub client_control_mode: ZoneControlMode,

    pub label: Option<String>,

    pub nonce: Option<String>,

    /// Dump API traffic
    pub debug: bool,

    pub debug_level: DebugLevel,

    #[serde(skip)]
    debug_sink: Option<DebugSink>,
}

impl ProviderConfig {
    pub fn new(login: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            private_key: private_key.into(),
            ..Self::default()
        }
    }

    /// `~/.transip-dns/config.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".transip-dns").join("config.yaml"))
    }

    /// Load from an explicit path, or the default path when none is given
    pub fn load_at(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ProviderConfig = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Check the settings that authentication cannot do without
    pub fn validate(&self) -> Result<()> {
        if self.login.trim().is_empty() {
            return Err(ConfigError::MissingLogin.into());
        }
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::PrivateKey("no private key configured".to_string()).into());
        }
        self.base_url()?;
        Ok(())
    }

    /// Configured base URI as a directory URL (always ends in `/`)
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_uri.as_deref().unwrap_or(DEFAULT_BASE_URI);
        let mut url = Url::parse(raw)
            .map_err(|e| ConfigError::Invalid(format!("invalid base_uri '{raw}': {e}")))?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Lifetime to request: explicit setting, else one hour for memory
    /// storage and one day otherwise
    pub fn resolved_expiration(&self) -> ExpirationTime {
        match self.expiration_time {
            Some(expiration) => expiration,
            None if self.store_location() == StoreLocation::Memory => ExpirationTime::OneHour,
            None => ExpirationTime::OneDay,
        }
    }

    pub fn store_location(&self) -> StoreLocation {
        StoreLocation::parse(&self.token_storage)
    }

    /// Send the wire dump to a writer of the caller's choosing
    pub fn set_debug_sink(&mut self, sink: DebugSink) {
        self.debug = true;
        self.debug_level = sink.level();
        self.debug_sink = Some(sink);
    }
}

impl AuthConfig for ProviderConfig {
    fn login(&self) -> &str {
        &self.login
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn global_key(&self) -> bool {
        !self.not_global_key
    }

    fn private_key(&self) -> Result<RsaPrivateKey> {
        load_private_key(&self.private_key)
    }

    fn base_uri(&self) -> Option<Url> {
        self.base_url().ok()
    }

    fn label(&self) -> Option<String> {
        self.label.clone().filter(|l| !l.is_empty())
    }

    fn nonce(&self) -> Option<String> {
        self.nonce.clone().filter(|n| !n.is_empty())
    }

    fn expiration_time(&self) -> Option<ExpirationTime> {
        Some(self.resolved_expiration())
    }

    fn debug(&self) -> Option<DebugSink> {
        if !self.debug {
            return None;
        }
        Some(
            self.debug_sink
                .clone()
                .unwrap_or_else(|| DebugSink::stdout(self.debug_level)),
        )
    }
}

/// Parse an RSA private key from inline PEM text or from a PEM file.
///
/// Both PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`)
/// encodings are accepted.
pub fn load_private_key(value: &str) -> Result<RsaPrivateKey> {
    let value = value.trim();

    let pem = if value.starts_with("-----BEGIN") {
        value.to_string()
    } else {
        std::fs::read_to_string(value).map_err(|e| {
            ConfigError::PrivateKey(format!("cannot read key file '{value}': {e}"))
        })?
    };

    if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(&pem)
            .map_err(|e| ConfigError::PrivateKey(e.to_string()).into())
    } else if pem.contains("BEGIN PRIVATE KEY") {
        RsaPrivateKey::from_pkcs8_pem(&pem)
            .map_err(|e| ConfigError::PrivateKey(e.to_string()).into())
    } else {
        Err(ConfigError::PrivateKey("no PEM encoded RSA private key found".to_string()).into())
    }
}
