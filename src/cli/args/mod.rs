//! Shared CLI argument types
//!
//! Reusable argument structs that are flattened into commands with
//! `#[command(flatten)]`.

mod common;
mod global;
mod record;

pub use common::OutputFormat;
pub use global::GlobalOptions;
pub use record::{RecordArgs, RecordFilterArgs};
