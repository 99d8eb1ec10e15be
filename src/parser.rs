//! X archive tweets parser.
//!
//! The tweets file of an X export is JavaScript, not JSON:
//! `window.YTD.tweets.part0 = [ { "tweet": { ... } }, ... ]`.
//! The fixed assignment prefix is stripped and the rest parsed as a JSON
//! array.

use crate::error::{Result, XmdError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Assignment prefix of the tweets data file.
pub const TWEETS_PREFIX: &str = "window.YTD.tweets.part0 = ";

/// Location of the tweets file inside an extracted archive directory.
pub const TWEETS_FILE: &str = "data/tweets.js";

/// Reader for the tweets file of an X archive.
pub struct ArchiveParser {
    tweets_path: PathBuf,
}

impl ArchiveParser {
    /// Accepts either the tweets file itself or the extracted archive
    /// directory containing `data/tweets.js`.
    pub fn new(archive_path: impl AsRef<Path>) -> Self {
        let archive_path = archive_path.as_ref();
        let tweets_path = if archive_path.is_dir() {
            archive_path.join(TWEETS_FILE)
        } else {
            archive_path.to_path_buf()
        };
        Self { tweets_path }
    }

    /// Path of the file that will be read.
    #[must_use]
    pub fn tweets_path(&self) -> &Path {
        &self.tweets_path
    }

    /// Strip the fixed prefix and parse the JSON array.
    fn parse_js_file(&self, content: &str) -> Result<Vec<Value>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let json_str = content.strip_prefix(TWEETS_PREFIX).ok_or_else(|| {
            XmdError::invalid_archive(format!(
                "'{}' does not start with '{}'",
                self.tweets_path.display(),
                TWEETS_PREFIX.trim_end()
            ))
        })?;

        let data: Value = serde_json::from_str(json_str).map_err(|e| {
            XmdError::parse_error(self.tweets_path.display().to_string(), e.to_string())
        })?;

        match data {
            Value::Array(items) => Ok(items),
            other => Err(XmdError::invalid_archive(format!(
                "expected a JSON array of tweets, found {}",
                json_type(&other)
            ))),
        }
    }

    /// Parse all tweet records, in archive order.
    ///
    /// Each array element is `{ "tweet": { ... } }`; the inner object is
    /// returned unchanged. Elements without a `tweet` object are skipped.
    ///
    /// # Errors
    /// Fails if the file is missing or unreadable, lacks the prefix, or is
    /// not a JSON array.
    pub fn parse_tweets(&self) -> Result<Vec<Value>> {
        if !self.tweets_path.exists() {
            return Err(XmdError::archive_not_found(&self.tweets_path));
        }
        info!("Parsing {}...", self.tweets_path.display());

        let content = std::fs::read_to_string(&self.tweets_path)
            .map_err(|e| XmdError::path_error("read", &self.tweets_path, e))?;

        let tweets: Vec<Value> = self
            .parse_js_file(&content)?
            .into_iter()
            .enumerate()
            .filter_map(|(index, mut item)| match item.get_mut("tweet") {
                Some(tweet) if tweet.is_object() => Some(tweet.take()),
                _ => {
                    warn!(index, "Skipping archive entry without a tweet object");
                    None
                }
            })
            .collect();

        debug!(count = tweets.len(), "Extracted tweet records");
        info!("Parsed {} tweets", tweets.len());
        Ok(tweets)
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
