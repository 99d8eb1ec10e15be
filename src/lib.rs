//! xmd - X/Twitter archive to Markdown notes
//!
//! This library turns the tweet records of an X data export into one
//! Markdown document per tweet, placed in a `YYYY/MM/DD/<id>.md` tree, with
//! optional per-user backlink files.
//!
//! # Modules
//!
//! - [`parser`] - Reads the `window.YTD.tweets.part0 = [...]` tweets file
//! - [`fields`] - Defensive access to loosely-typed tweet fields
//! - [`sanitize`] - Markup stripping and file-name sanitizing
//! - [`dates`] - Timestamp parsing and date-derived labels and paths
//! - [`render`] - Tweet-to-document rendering
//! - [`paths`] - Output path resolution
//! - [`users`] - Per-user backlink files
//! - [`export`] - The export driver
//! - [`config`] - Layered configuration
//! - [`error`] - Custom error types with rich context

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod fields;
pub mod logging;
pub mod model;
pub mod parser;
pub mod paths;
pub mod render;
pub mod sanitize;
pub mod users;

pub use cli::*;
pub use config::Config;
pub use error::{Result, XmdError, format_error};
pub use export::{ExportSummary, Exporter, RecordOutcome};
pub use model::*;
pub use parser::ArchiveParser;
pub use users::{BacklinkSink, MemorySink, UserFiles};

/// Format a usize with thousands separators.
#[must_use]
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
