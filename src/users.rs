//! Per-user backlink files.
//!
//! Each user file is a flat append log: one `- [[<tweet file>]]` line per
//! tweet that replied to that user. Files are created on first use and never
//! rewritten.

use crate::error::{Result, XmdError};
use crate::render::wiki_link;
use crate::sanitize::sanitize_path_segment;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Destination for per-user backlinks.
pub trait BacklinkSink {
    /// Append one line referencing `tweet_file` to `username`'s file.
    ///
    /// Returns `false` when the name cannot be turned into a file and
    /// nothing was written.
    ///
    /// # Errors
    /// Returns an error if the backlink could not be recorded.
    fn append_backlink(&mut self, username: &str, tweet_file: &str) -> Result<bool>;
}

/// The line appended for one backlink, without the trailing newline.
#[must_use]
pub fn backlink_line(tweet_file: &str) -> String {
    format!("- {}", wiki_link(tweet_file))
}

/// Backlink files stored as `<users_dir>/<sanitized username>.md`.
#[derive(Debug, Clone)]
pub struct UserFiles {
    users_dir: PathBuf,
}

impl UserFiles {
    pub fn new(users_dir: impl AsRef<Path>) -> Self {
        Self {
            users_dir: users_dir.as_ref().to_path_buf(),
        }
    }

    /// File that holds `username`'s backlinks, or `None` if the name
    /// sanitizes to nothing.
    #[must_use]
    pub fn user_file(&self, username: &str) -> Option<PathBuf> {
        let stem = sanitize_path_segment(username);
        if stem.trim().is_empty() {
            return None;
        }
        Some(self.users_dir.join(format!("{stem}.md")))
    }
}

impl BacklinkSink for UserFiles {
    fn append_backlink(&mut self, username: &str, tweet_file: &str) -> Result<bool> {
        let Some(path) = self.user_file(username) else {
            warn!(username, "Skipping backlink for a username with no usable characters");
            return Ok(false);
        };

        std::fs::create_dir_all(&self.users_dir)
            .map_err(|e| XmdError::path_error("create directory", &self.users_dir, e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| XmdError::path_error("open", &path, e))?;
        writeln!(file, "{}", backlink_line(tweet_file))
            .map_err(|e| XmdError::path_error("append to", &path, e))?;

        debug!(username, file = %path.display(), "Appended backlink");
        Ok(true)
    }
}

/// In-memory sink, used for dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: BTreeMap<String, Vec<String>>,
}

impl BacklinkSink for MemorySink {
    fn append_backlink(&mut self, username: &str, tweet_file: &str) -> Result<bool> {
        let stem = sanitize_path_segment(username);
        if stem.trim().is_empty() {
            return Ok(false);
        }
        self.lines
            .entry(stem)
            .or_default()
            .push(backlink_line(tweet_file));
        Ok(true)
    }
}
