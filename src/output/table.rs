//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use transip_dns::Record;
use transip_dns::client::Domain;

/// One DNS record per row
#[derive(Debug, Tabled)]
pub struct RecordRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "TTL")]
    pub ttl: u64,
    #[tabled(rename = "TYPE")]
    pub record_type: String,
    #[tabled(rename = "CONTENT")]
    pub content: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            ttl: record.ttl.as_secs(),
            record_type: record.record_type.clone(),
            content: record.data.clone(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct ZoneRow {
    #[tabled(rename = "ZONE")]
    pub name: String,
}

impl From<&Domain> for ZoneRow {
    fn from(domain: &Domain) -> Self {
        Self {
            name: domain.name.clone(),
        }
    }
}

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}
