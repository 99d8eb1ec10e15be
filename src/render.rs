//! Tweet-to-document rendering.
//!
//! [`build`] maps one tweet record to a [`Document`]: a frontmatter block of
//! attribute lines followed by the block-quoted tweet text. Attribute lines
//! are emitted in a fixed order:
//!
//! 1. `retweeted: true` (retweets only)
//! 2. `replying to` / `replying to id` (replies only)
//! 3. `users mentioned` (when there are mentions)
//! 4. `date`, `daily note`, `favourite count`, `retweet count`, `source`
//!
//! Rendering performs no IO. Backlinks for per-user files are returned on
//! the document and applied by the exporter after the tweet file is written.

use crate::dates::{daily_note_link, format_date, format_date_time};
use crate::error::Result;
use crate::fields::{self, ABSENT};
use crate::model::{Backlink, Document, OmitReason, RenderOptions, Rendered};
use crate::sanitize::strip_markup;
use itertools::Itertools;
use serde_json::Value;
use tracing::trace;

/// Wrap a name as a wiki-link cross-reference token: `[[name]]`.
#[must_use]
pub fn wiki_link(name: &str) -> String {
    format!("[[{name}]]")
}

/// Render one tweet record.
///
/// Returns [`Rendered::Omitted`] for a retweet while
/// [`RenderOptions::include_retweets`] is off.
///
/// # Errors
/// Fails only when the daily-note link cannot be built, i.e. `created_at` is
/// missing or malformed. Every other absent field renders a default.
pub fn build(tweet: &Value, options: &RenderOptions) -> Result<Rendered> {
    let retweeted = fields::get_bool(tweet, "retweeted", false);
    if retweeted && !options.include_retweets {
        trace!("Omitting retweet");
        return Ok(Rendered::Omitted(OmitReason::Retweet));
    }

    let mut frontmatter = Vec::new();
    let mut backlinks = Vec::new();

    if retweeted {
        frontmatter.push("retweeted: true".to_string());
    }

    if let Some(reply_to_id) = fields::get_nonempty_scalar(tweet, "in_reply_to_user_id") {
        let reply_to_name = fields::get_nonempty_str(tweet, "in_reply_to_screen_name");
        frontmatter.push(format!(
            "replying to: \"{}\"",
            wiki_link(reply_to_name.unwrap_or(ABSENT))
        ));
        frontmatter.push(format!("replying to id: \"{}\"", wiki_link(&reply_to_id)));

        if options.create_user_files {
            if let Some(username) = reply_to_name {
                backlinks.push(Backlink {
                    username: username.to_string(),
                });
            }
        }
    }

    let mentioned = mentioned_users(tweet);
    if !mentioned.is_empty() {
        frontmatter.push(format!(
            "users mentioned: \"{}\"",
            mentioned.iter().map(|name| wiki_link(name)).join(", ")
        ));
    }

    let created_at = fields::get_str(tweet, "created_at").unwrap_or(ABSENT);
    let date = format_date(created_at);
    frontmatter.push(format!("date: \"{}\"", format_date_time(created_at)));
    frontmatter.push(format!(
        "daily note: \"[{date}]({})\"",
        daily_note_link(&date)?
    ));
    frontmatter.push(format!(
        "favourite count: {}",
        fields::scalar_text(tweet, "favorite_count")
    ));
    frontmatter.push(format!(
        "retweet count: {}",
        fields::scalar_text(tweet, "retweet_count")
    ));
    frontmatter.push(format!(
        "source: {}",
        strip_markup(fields::get_str(tweet, "source").unwrap_or(ABSENT))
    ));

    Ok(Rendered::Document(Document {
        frontmatter,
        body: quote_body(fields::get_str(tweet, "full_text").unwrap_or(ABSENT)),
        backlinks,
    }))
}

/// Screen names from `entities.user_mentions`, in order, duplicates kept.
fn mentioned_users(tweet: &Value) -> Vec<&str> {
    fields::get_array(tweet, "entities.user_mentions")
        .iter()
        .filter_map(|mention| fields::get_nonempty_str(mention, "screen_name"))
        .collect()
}

/// Block-quote every line of the text, followed by a blank line.
fn quote_body(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    lines.push(String::new());
    lines
}
