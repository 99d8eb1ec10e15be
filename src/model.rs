//! Data models for the tweet-to-Markdown transformation.
//!
//! Tweet records themselves stay as [`serde_json::Value`]: the export's
//! schema is loose and every field is read defensively through
//! [`crate::fields`]. The types here describe what the transformation
//! produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opening and closing delimiter of the frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Tag list written at the end of every frontmatter block.
pub const TAG_BLOCK: &str = "tags: \n- twitter";

/// Which optional sections of output are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// Write files for retweets too. When off, retweets are omitted.
    pub include_retweets: bool,
    /// Append a backlink to the reply target's per-user file.
    pub create_user_files: bool,
    /// Fail a record whose output path was already written in this run.
    pub detect_duplicates: bool,
}

/// A backlink the renderer asks to be appended to a per-user file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backlink {
    /// Screen name of the user whose file receives the line.
    pub username: String,
}

/// One rendered tweet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Attribute lines, without delimiters or tag list.
    pub frontmatter: Vec<String>,
    /// Body lines, ending with an empty line.
    pub body: Vec<String>,
    /// Per-user backlinks to append once the document is written.
    pub backlinks: Vec<Backlink>,
}

impl Document {
    /// Assemble the final Markdown text.
    ///
    /// Layout is fixed: delimiter, attribute lines, tag list, delimiter,
    /// body lines.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        format!(
            "{FRONTMATTER_DELIMITER}\n{}\n{TAG_BLOCK}\n{FRONTMATTER_DELIMITER}\n{}",
            self.frontmatter.join("\n"),
            self.body.join("\n")
        )
    }

    /// Find an attribute line by key (`"source"` matches `source: Web`).
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.frontmatter.iter().find_map(|line| {
            line.strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(": "))
        })
    }
}

/// Why a record produced no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitReason {
    /// Retweet while retweets are excluded.
    Retweet,
}

impl fmt::Display for OmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retweet => write!(f, "retweet"),
        }
    }
}

/// Outcome of rendering one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Document(Document),
    Omitted(OmitReason),
}

impl Rendered {
    /// The document, if one was produced.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Omitted(_) => None,
        }
    }

    #[must_use]
    pub const fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted(_))
    }
}

/// Relative output location of a tweet: `YYYY/MM/DD/<sanitized-id>.md`.
///
/// Always `/`-separated, independent of the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPath(String);

impl OutputPath {
    pub(crate) const fn new(relative: String) -> Self {
        Self(relative)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join onto a base directory, one component per segment.
    #[must_use]
    pub fn under(&self, base: &Path) -> PathBuf {
        self.0
            .split('/')
            .fold(base.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
