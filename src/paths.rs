//! Output path resolution for tweet files.

use crate::dates::tweet_path_segment;
use crate::error::{Result, XmdError};
use crate::fields;
use crate::model::OutputPath;
use crate::sanitize::sanitize_path_segment;
use serde_json::Value;

/// Resolve `YYYY/MM/DD/<sanitized-id>.md` from an id and its timestamp.
///
/// The result is a pure function of both inputs, so two records sharing an
/// id and timestamp resolve to the same path.
///
/// # Errors
/// [`XmdError::InvalidTweetId`] if the id sanitizes to nothing,
/// [`XmdError::MissingField`] if `created_at` is absent, and
/// [`XmdError::InvalidDate`] if it does not parse.
pub fn resolve(id: &str, created_at: Option<&str>) -> Result<OutputPath> {
    let file_stem = sanitize_path_segment(id);
    if file_stem.trim().is_empty() {
        return Err(XmdError::InvalidTweetId { id: id.to_string() });
    }
    let created_at = created_at.ok_or(XmdError::MissingField {
        field: "created_at",
    })?;
    tweet_path_segment(&file_stem, created_at).map(OutputPath::new)
}

/// Resolve the output path straight from a tweet record.
///
/// # Errors
/// As [`resolve`], plus [`XmdError::MissingField`] when the record has no id.
pub fn resolve_record(tweet: &Value) -> Result<OutputPath> {
    let id = fields::tweet_id(tweet).ok_or(XmdError::MissingField { field: "id" })?;
    resolve(&id, fields::get_str(tweet, "created_at"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn path_shape() -> Regex {
        Regex::new(r"^[0-9]{4}/[0-9]{2}/[0-9]{2}/[A-Za-z0-9 ._-]+\.md$").unwrap()
    }

    #[test]
    fn test_resolve_basic() {
        let path = resolve("1", Some("Mon Jan 01 10:00:00 +0000 2024")).unwrap();
        assert_eq!(path.as_str(), "2024/01/01/1.md");
    }

    #[test]
    fn test_resolved_paths_match_shape() {
        let shape = path_shape();
        let cases = [
            ("1234567890123456789", "Wed Jan 08 12:00:00 +0000 2025"),
            ("../../etc/passwd", "Sat Dec 31 23:59:59 +0000 2022"),
            ("id with spaces  ", "Thu Feb 29 06:07:08 +0000 2024"),
            ("weird/\\:*?\"<>|id", "Tue Oct 09 00:00:00 +0000 2007"),
        ];
        for (id, ts) in cases {
            let path = resolve(id, Some(ts)).unwrap();
            assert!(shape.is_match(path.as_str()), "bad path {path} for {id:?}");
        }
    }

    #[test]
    fn test_resolved_components_follow_timestamp() {
        let path = resolve("7", Some("Thu Feb 29 06:07:08 +0000 2024")).unwrap();
        assert!(path.as_str().starts_with("2024/02/29/"));
    }

    #[test]
    fn test_wrong_weekday_does_not_block_placement() {
        let path = resolve("1", Some("Tue Jan 01 10:00:00 +0000 2024")).unwrap();
        assert_eq!(path.as_str(), "2024/01/01/1.md");
    }

    #[test]
    fn test_missing_created_at_fails() {
        let err = resolve("1", None).unwrap_err();
        assert!(matches!(err, XmdError::MissingField { field: "created_at" }));
    }

    #[test]
    fn test_malformed_created_at_fails() {
        let err = resolve("1", Some("2024-01-01")).unwrap_err();
        assert!(matches!(err, XmdError::InvalidDate { .. }));
    }

    #[test]
    fn test_id_that_sanitizes_to_nothing_fails() {
        let err = resolve("日本/", Some("Mon Jan 01 10:00:00 +0000 2024")).unwrap_err();
        assert!(matches!(err, XmdError::InvalidTweetId { .. }));
    }

    #[test]
    fn test_resolve_record_uses_id_str_fallback() {
        let tweet = json!({
            "id_str": "99",
            "created_at": "Mon Jan 01 10:00:00 +0000 2024"
        });
        assert_eq!(resolve_record(&tweet).unwrap().as_str(), "2024/01/01/99.md");

        let err = resolve_record(&json!({"created_at": "Mon Jan 01 10:00:00 +0000 2024"}))
            .unwrap_err();
        assert!(matches!(err, XmdError::MissingField { field: "id" }));
    }
}
