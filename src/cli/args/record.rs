//! Record arguments for the `records` subcommands

use clap::Args;
use std::time::Duration;

use transip_dns::Record;

/// A complete record, as accepted by `append` and `set`
#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    /// Record name, relative (`www`, `@`) or fully qualified
    #[arg(long)]
    pub name: String,

    /// Record type (A, AAAA, CNAME, MX, TXT, ...)
    #[arg(long = "type")]
    pub record_type: String,

    /// Record content
    #[arg(long)]
    pub content: String,

    /// TTL in seconds
    #[arg(long, default_value_t = 3600)]
    pub ttl: u64,
}

impl RecordArgs {
    pub fn to_record(&self) -> Record {
        Record::new(
            &self.name,
            self.record_type.to_ascii_uppercase(),
            &self.content,
            Duration::from_secs(self.ttl),
        )
    }
}

/// Records to delete; anything left out matches every value
#[derive(Debug, Clone, Args)]
pub struct RecordFilterArgs {
    /// Record name, relative (`www`, `@`) or fully qualified
    #[arg(long)]
    pub name: String,

    /// Only records of this type
    #[arg(long = "type")]
    pub record_type: Option<String>,

    /// Only records with this content
    #[arg(long)]
    pub content: Option<String>,

    /// Only records with this TTL in seconds
    #[arg(long)]
    pub ttl: Option<u64>,
}

impl RecordFilterArgs {
    pub fn to_filter(&self) -> Record {
        Record::new(
            &self.name,
            self.record_type
                .as_deref()
                .unwrap_or_default()
                .to_ascii_uppercase(),
            self.content.clone().unwrap_or_default(),
            Duration::from_secs(self.ttl.unwrap_or(0)),
        )
    }
}
