//! Timestamp parsing and the date-derived labels, links and paths.
//!
//! X exports stamp every tweet as `Fri Jan 09 15:12:21 +0000 2026`. The
//! literal calendar fields are used as-is: the embedded offset is parsed
//! but never applied, and the leading weekday is skipped unchecked.
//!
//! Display helpers ([`format_date`], [`format_date_time`]) fall back to the
//! raw input when it does not parse. Anything that has to place a file
//! ([`daily_note_link`], [`tweet_path_segment`]) fails instead.

use crate::error::{Result, XmdError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

/// `created_at` layout in X exports.
pub const X_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// [`X_DATE_FORMAT`] after its weekday token.
const DATE_AFTER_WEEKDAY: &str = "%b %d %H:%M:%S %z %Y";

/// Root folder of the daily-journal notes.
pub const DAILY_NOTES_DIR: &str = "/Dailies";

/// Parse an X `created_at` value into its literal calendar fields.
///
/// The weekday only has to be present. chrono would reject a weekday that
/// disagrees with the date, so it is cut off before parsing.
///
/// # Errors
/// Returns [`XmdError::InvalidDate`] when the string does not match
/// [`X_DATE_FORMAT`].
pub fn parse_x_date(date_str: &str) -> Result<NaiveDateTime> {
    let (_weekday, rest) = date_str
        .trim()
        .split_once(' ')
        .ok_or_else(|| XmdError::invalid_date(date_str, "created_at (no weekday)"))?;
    DateTime::parse_from_str(rest.trim_start(), DATE_AFTER_WEEKDAY)
        .map(|dt| dt.naive_local())
        .map_err(|e| XmdError::invalid_date(date_str, format!("created_at ({e})")))
}

/// `YYYY-MM-DD`, or the input unchanged when it does not parse.
#[must_use]
pub fn format_date(date_str: &str) -> String {
    parse_x_date(date_str).map_or_else(
        |_| {
            trace!(input = date_str, "Leaving unparsed date as-is");
            date_str.to_string()
        },
        |dt| dt.format("%Y-%m-%d").to_string(),
    )
}

/// `YYYY-MM-DD HH:MM:SS`, or the input unchanged when it does not parse.
#[must_use]
pub fn format_date_time(date_str: &str) -> String {
    parse_x_date(date_str).map_or_else(
        |_| {
            trace!(input = date_str, "Leaving unparsed date-time as-is");
            date_str.to_string()
        },
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Link to the daily note for a `YYYY-MM-DD` date: `/Dailies/YYYY-MM-DD.md`.
///
/// # Errors
/// Returns [`XmdError::InvalidDate`] when `date_str` is not `YYYY-MM-DD`,
/// which is what [`format_date`] hands back for an unparseable timestamp.
pub fn daily_note_link(date_str: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| XmdError::invalid_date(date_str, format!("daily note link ({e})")))?;
    Ok(format!("{DAILY_NOTES_DIR}/{}.md", date.format("%Y-%m-%d")))
}

/// Relative file path for a tweet: `YYYY/MM/DD/<id>.md`.
///
/// `id` is used verbatim; callers sanitize it first.
///
/// # Errors
/// Returns [`XmdError::InvalidDate`] when `created_at` does not parse.
pub fn tweet_path_segment(id: &str, created_at: &str) -> Result<String> {
    let dt = parse_x_date(created_at)?;
    Ok(format!("{}/{id}.md", dt.format("%Y/%m/%d")))
}
