//! The export driver: tweet records in, Markdown files out.
//!
//! Records are processed strictly in sequence. For each one the output path
//! is resolved, the document rendered and written, and only then are its
//! per-user backlinks appended, so user files never interleave.

use crate::error::{Result, XmdError};
use crate::fields;
use crate::model::{OmitReason, OutputPath, RenderOptions, Rendered};
use crate::paths::resolve_record;
use crate::render::build;
use crate::users::BacklinkSink;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Document written (or, in a dry run, planned) at `path`.
    ///
    /// `backlink_failures` holds the errors of backlinks that could not be
    /// appended under `keep_going`; the document itself is on disk.
    Written {
        id: String,
        path: OutputPath,
        backlinks: usize,
        backlink_failures: Vec<String>,
    },
    /// No document for this record.
    Omitted { id: String, reason: OmitReason },
    /// Record failed and the run continued.
    Failed { id: String, message: String },
}

impl RecordOutcome {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Written { id, .. } | Self::Omitted { id, .. } | Self::Failed { id, .. } => id,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub total: usize,
    pub written: usize,
    pub omitted: usize,
    pub backlinks: usize,
    /// `(record id, error message)` for every isolated failure.
    pub failed: Vec<(String, String)>,
}

impl ExportSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes tweet documents under an output directory.
pub struct Exporter<S: BacklinkSink> {
    output_dir: PathBuf,
    options: RenderOptions,
    sink: S,
    keep_going: bool,
    dry_run: bool,
    written: HashSet<OutputPath>,
}

impl<S: BacklinkSink> Exporter<S> {
    pub fn new(output_dir: impl AsRef<Path>, options: RenderOptions, sink: S) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            options,
            sink,
            keep_going: false,
            dry_run: false,
            written: HashSet::new(),
        }
    }

    /// Log and count failing records instead of aborting the run.
    #[must_use]
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Resolve and render everything but write no tweet files.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The backlink sink, e.g. to inspect a dry run.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Export every record, calling `on_record` after each one.
    ///
    /// # Errors
    /// Without `keep_going`, the first failing record aborts the run; the
    /// error is wrapped in [`XmdError::Record`] with the record identifier.
    pub fn run<F>(&mut self, tweets: &[Value], mut on_record: F) -> Result<ExportSummary>
    where
        F: FnMut(&RecordOutcome),
    {
        info!(
            records = tweets.len(),
            output = %self.output_dir.display(),
            dry_run = self.dry_run,
            "Exporting tweets"
        );

        let mut summary = ExportSummary {
            total: tweets.len(),
            ..ExportSummary::default()
        };

        for (index, tweet) in tweets.iter().enumerate() {
            let label = record_label(tweet, index);
            let outcome = match self.export_record(tweet) {
                Ok(outcome) => outcome,
                Err(err) => {
                    let err = err.for_record(&label);
                    if !self.keep_going {
                        return Err(err);
                    }
                    error!(record = %label, "{err}");
                    RecordOutcome::Failed {
                        id: label,
                        message: err.root().to_string(),
                    }
                }
            };

            match &outcome {
                RecordOutcome::Written {
                    id,
                    backlinks,
                    backlink_failures,
                    ..
                } => {
                    summary.written += 1;
                    summary.backlinks += backlinks;
                    summary.failed.extend(
                        backlink_failures
                            .iter()
                            .map(|message| (id.clone(), message.clone())),
                    );
                }
                RecordOutcome::Omitted { .. } => summary.omitted += 1,
                RecordOutcome::Failed { id, message } => {
                    summary.failed.push((id.clone(), message.clone()));
                }
            }
            on_record(&outcome);
        }

        info!(
            written = summary.written,
            omitted = summary.omitted,
            failed = summary.failed.len(),
            "Export finished"
        );
        Ok(summary)
    }

    /// Export a single record.
    ///
    /// Backlinks are appended after the document is written. With
    /// `keep_going`, a failing backlink is reported on the outcome and the
    /// record still counts as written.
    ///
    /// # Errors
    /// Path resolution, rendering, duplicate detection and filesystem
    /// failures. Without `keep_going`, a backlink failure is returned too,
    /// and the tweet file is already on disk at that point.
    pub fn export_record(&mut self, tweet: &Value) -> Result<RecordOutcome> {
        let path = resolve_record(tweet)?;
        let id = fields::tweet_id(tweet).unwrap_or_default();

        let document = match build(tweet, &self.options)? {
            Rendered::Document(document) => document,
            Rendered::Omitted(reason) => {
                debug!(id, %reason, "Omitted");
                return Ok(RecordOutcome::Omitted { id, reason });
            }
        };

        if !self.written.insert(path.clone()) {
            if self.options.detect_duplicates {
                return Err(XmdError::DuplicateTweet {
                    id,
                    path: path.to_string(),
                });
            }
            debug!(id, path = %path, "Overwriting file written earlier in this run");
        }

        if !self.dry_run {
            self.write_document(&path, &document.to_markdown())?;
        }

        let mut backlinks = 0;
        let mut backlink_failures = Vec::new();
        for backlink in &document.backlinks {
            match self.sink.append_backlink(&backlink.username, path.as_str()) {
                Ok(true) => backlinks += 1,
                Ok(false) => {}
                Err(err) if self.keep_going => {
                    error!(id, username = %backlink.username, "{err}");
                    backlink_failures.push(format!(
                        "backlink for '{}': {err}",
                        backlink.username
                    ));
                }
                Err(err) => return Err(err),
            }
        }

        debug!(id, path = %path, backlinks, "Exported");
        Ok(RecordOutcome::Written {
            id,
            path,
            backlinks,
            backlink_failures,
        })
    }

    fn write_document(&self, path: &OutputPath, markdown: &str) -> Result<()> {
        let target = path.under(&self.output_dir);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| XmdError::path_error("create directory", parent, e))?;
        }
        std::fs::write(&target, markdown).map_err(|e| XmdError::path_error("write", &target, e))
    }
}

/// Identifier used in logs and errors: the tweet id, else the position.
fn record_label(tweet: &Value, index: usize) -> String {
    fields::tweet_id(tweet).unwrap_or_else(|| format!("#{index} (no id)"))
}
