//! Custom error types for xmd.
//!
//! Field-level problems never reach this type: missing tweet fields are
//! absorbed by defaults inside the renderer. What remains are the structural
//! failures (archive format, dates that cannot place a file, filesystem
//! writes) that stop a record or the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for xmd operations.
#[derive(Error, Debug)]
pub enum XmdError {
    // =========================================================================
    // Archive Errors
    // =========================================================================
    /// Archive file not found at the specified path.
    #[error("Archive not found at '{path}'")]
    ArchiveNotFound { path: PathBuf },

    /// Archive exists but does not look like a tweets export.
    #[error("Invalid archive: {reason}")]
    InvalidArchive { reason: String },

    /// The archive payload is not valid JSON.
    #[error("Failed to parse '{file}': {reason}")]
    ParseError { file: String, reason: String },

    // =========================================================================
    // Record Errors
    // =========================================================================
    /// Timestamp does not match `<weekday> <month> <day> <HH:MM:SS> <offset> <year>`.
    #[error("Invalid date format '{value}' in {context}")]
    InvalidDate { value: String, context: String },

    /// A field needed to place the record is absent.
    #[error("Tweet record is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Tweet id sanitizes to an empty file name.
    #[error("Invalid tweet ID: '{id}'")]
    InvalidTweetId { id: String },

    /// Two records resolved to the same output file.
    #[error("Duplicate tweet: '{id}' resolves to '{path}', already written by this run")]
    DuplicateTweet { id: String, path: String },

    /// A record failed; wraps the underlying cause with the tweet identifier.
    #[error("Failed to export tweet {id}: {source}")]
    Record {
        id: String,
        #[source]
        source: Box<XmdError>,
    },

    // =========================================================================
    // IO Errors
    // =========================================================================
    /// Path-specific IO error with context.
    #[error("Failed to {operation} '{path}': {source}")]
    PathError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },

    /// A required setting has no value from any source.
    #[error("Missing setting '{key}'")]
    MissingSetting { key: &'static str },
}

/// Result type alias for xmd operations.
pub type Result<T> = std::result::Result<T, XmdError>;

impl XmdError {
    /// Create an archive not found error.
    pub fn archive_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ArchiveNotFound { path: path.into() }
    }

    /// Create an invalid archive error.
    pub fn invalid_archive(reason: impl Into<String>) -> Self {
        Self::InvalidArchive {
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid date error.
    pub fn invalid_date(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            context: context.into(),
        }
    }

    /// Create a path error with context.
    pub fn path_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::PathError {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Attach the identifier of the record being processed.
    #[must_use]
    pub fn for_record(self, id: impl Into<String>) -> Self {
        Self::Record {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// Identifier of the failing record, if this error carries one.
    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::Record { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Innermost error, skipping record wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Record { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get a suggestion for how to fix this error, if applicable.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.root() {
            Self::ArchiveNotFound { .. } => Some(
                "Pass the extracted export directory or its data/tweets.js file.",
            ),
            Self::InvalidArchive { .. } | Self::ParseError { .. } => Some(
                "The file must start with 'window.YTD.tweets.part0 = ' followed by a JSON array.",
            ),
            Self::InvalidDate { .. } | Self::MissingField { .. } => {
                Some("Use --keep-going to skip records that cannot be placed.")
            }
            Self::DuplicateTweet { .. } => {
                Some("Drop --detect-duplicates to let the last record win.")
            }
            Self::ConfigError { .. } => Some("Run 'xmd config --init' to see a valid config."),
            Self::MissingSetting { .. } => {
                Some("Set it in the config file, the environment, or on the command line.")
            }
            _ => None,
        }
    }
}

// =============================================================================
// CLI Error Formatting Utilities
// =============================================================================

use colored::Colorize;

/// Format a structured CLI error with explanation and suggestions.
#[must_use]
pub fn format_error(title: &str, explanation: &str, suggestions: &[&str]) -> String {
    use std::fmt::Write;

    let mut output = format!("{} {}", "✗".red().bold(), title.bold());

    if !explanation.is_empty() {
        let _ = write!(output, "\n\n   {explanation}");
    }

    if !suggestions.is_empty() {
        output.push_str("\n\n   ");
        if suggestions.len() == 1 {
            let _ = write!(output, "{} {}", "Hint:".cyan(), suggestions[0]);
        } else {
            let _ = write!(output, "{}:", "Try".cyan());
            for suggestion in suggestions {
                let _ = write!(output, "\n     {} {}", "•".dimmed(), suggestion);
            }
        }
    }

    output
}

/// Calculate the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a_chars.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Find the closest candidate within `max_distance` edits (default 2).
///
/// Exact matches are not returned: they need no suggestion.
#[must_use]
pub fn find_closest_match<'a>(
    input: &str,
    candidates: &[&'a str],
    max_distance: Option<usize>,
) -> Option<&'a str> {
    let max_dist = max_distance.unwrap_or(2);
    let input_lower = input.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| {
            let distance = levenshtein_distance(&input_lower, &candidate.to_lowercase());
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= max_dist && *distance > 0)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Format a "did you mean?" suggestion.
#[must_use]
pub fn format_did_you_mean(suggestion: &str) -> String {
    format!("Did you mean '{}'?", suggestion.green())
}

/// Recognized keys of the `[properties]` config table.
pub const VALID_PROPERTY_KEYS: &[&str] =
    &["include_retweets", "create_user_files", "detect_duplicates"];
