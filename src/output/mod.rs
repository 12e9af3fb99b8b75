//! Output formatting for CLI results

use transip_dns::client::Domain;
use transip_dns::{Record, Result};

use crate::cli::OutputFormat;

pub mod json;
pub mod table;

use json::format_json;
use table::{RecordRow, ZoneRow, format_table};

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;
}

impl Formattable for [Record] {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => {
                let rows: Vec<RecordRow> = self.iter().map(RecordRow::from).collect();
                Ok(format_table(&rows))
            }
            OutputFormat::Json => Ok(format_json(self)?),
        }
    }
}

impl Formattable for [Domain] {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => {
                let rows: Vec<ZoneRow> = self.iter().map(ZoneRow::from).collect();
                Ok(format_table(&rows))
            }
            OutputFormat::Json => Ok(format_json(self)?),
        }
    }
}

/// Format and print data to stdout
pub fn print<T: Formattable + ?Sized>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}
