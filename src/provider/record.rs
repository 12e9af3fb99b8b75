//! Zone-relative DNS record model

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// A DNS record with a name relative to its zone (`@` for the apex)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub data: String,

    #[serde(serialize_with = "serialize_seconds")]
    pub ttl: Duration,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        data: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            data: data.into(),
            ttl,
        }
    }

    /// Copy with the name made relative to `zone`
    pub fn relative_to(&self, zone: &str) -> Self {
        Self {
            name: relative_name(&self.name, zone),
            ..self.clone()
        }
    }

    /// Same name, type and content. TTL is not part of identity.
    pub fn same_identity(&self, other: &Record) -> bool {
        self.same_rrset(other) && self.data == other.data
    }

    /// Same name and type
    pub fn same_rrset(&self, other: &Record) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.record_type.eq_ignore_ascii_case(&other.record_type)
    }

    /// Match against a deletion filter where an empty type, empty data or
    /// zero TTL matches anything
    pub fn matches_filter(&self, filter: &Record) -> bool {
        self.name.eq_ignore_ascii_case(&filter.name)
            && (filter.record_type.is_empty()
                || self.record_type.eq_ignore_ascii_case(&filter.record_type))
            && (filter.data.is_empty() || self.data == filter.data)
            && (filter.ttl.is_zero() || self.ttl == filter.ttl)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.ttl.as_secs(),
            self.record_type,
            self.data
        )
    }
}

fn serialize_seconds<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ttl.as_secs())
}

fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Name relative to the zone.
///
/// `www.example.com.` in `example.com.` is `www`, the apex is `@`. Names
/// outside the zone come back unchanged (without trailing dot).
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let trimmed = fqdn.trim_end_matches('.');
    let full = trimmed.to_ascii_lowercase();
    let zone = normalize_domain_name(zone);

    if full.is_empty() || full == "@" || full == zone {
        return "@".to_string();
    }

    match full.strip_suffix(&format!(".{zone}")) {
        // Lowercasing is ASCII-only, so byte offsets carry over.
        Some(subdomain) if !zone.is_empty() => trimmed[..subdomain.len()].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Fully qualified name with trailing dot
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = zone.trim_end_matches('.');

    if name.is_empty() || name == "@" {
        format!("{zone}.")
    } else if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.{zone}.")
    }
}
