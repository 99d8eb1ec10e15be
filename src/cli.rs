//! CLI definitions for xmd.
//!
//! Uses clap for argument parsing with derive macros.

use crate::logging::LogLevel;
use crate::model::RenderOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// xmd - X/Twitter archive to Markdown notes
#[derive(Parser, Debug)]
#[command(name = "xmd")]
#[command(version)]
#[command(about = "Convert an X/Twitter data archive into a dated tree of Markdown notes")]
#[command(long_about = r#"
xmd turns the tweets of an X/Twitter data export into one Markdown file per
tweet, laid out as <output>/YYYY/MM/DD/<tweet id>.md, ready to drop into a
notes vault.

Each file has a frontmatter block (date, counts, client, reply target,
mentions) linking to a daily note, followed by the quoted tweet text.
Replies can also be collected as backlinks in one file per user.

Quick start:
  1. Download and unzip your archive from x.com/settings
  2. Run: xmd export /path/to/twitter-archive -o vault/Tweets
"#)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, short = 'c', env = "XMD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (error, warn, info, debug, trace, off); overrides -v/-q
    #[arg(long, global = true, value_name = "LEVEL", env = "XMD_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one Markdown file per tweet
    Export(ExportArgs),

    /// Show config file locations, effective settings, or a template
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Archive directory or its data/tweets.js file
    pub archive: Option<PathBuf>,

    /// Base directory for the YYYY/MM/DD tree
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Directory for per-user backlink files
    #[arg(long)]
    pub users_dir: Option<PathBuf>,

    /// Write files for retweets too
    #[arg(long, overrides_with = "no_include_retweets")]
    pub include_retweets: bool,

    /// Skip retweets even if the config enables them
    #[arg(long, overrides_with = "include_retweets")]
    pub no_include_retweets: bool,

    /// Append reply backlinks to per-user files
    #[arg(long, overrides_with = "no_user_files")]
    pub user_files: bool,

    /// Write no per-user files even if the config enables them
    #[arg(long, overrides_with = "user_files")]
    pub no_user_files: bool,

    /// Fail a tweet whose output file was already written in this run
    #[arg(long, overrides_with = "no_detect_duplicates")]
    pub detect_duplicates: bool,

    /// Let the last tweet win even if the config enables detection
    #[arg(long, overrides_with = "detect_duplicates")]
    pub no_detect_duplicates: bool,

    /// Log failing tweets and continue; exit non-zero at the end
    #[arg(long, short = 'k')]
    pub keep_going: bool,

    /// Show where files would go without writing anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Apply the toggle flags over `options`. A flag given on the command
    /// line always wins; an absent pair leaves the setting alone.
    pub fn apply_toggles(&self, options: &mut RenderOptions) {
        for (slot, on, off) in [
            (
                &mut options.include_retweets,
                self.include_retweets,
                self.no_include_retweets,
            ),
            (
                &mut options.create_user_files,
                self.user_files,
                self.no_user_files,
            ),
            (
                &mut options.detect_duplicates,
                self.detect_duplicates,
                self.no_detect_duplicates,
            ),
        ] {
            if let Some(value) = toggle(on, off) {
                *slot = value;
            }
        }
    }
}

/// Collapse a `--flag` / `--no-flag` pair.
const fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show the effective configuration instead of the file lookup
    #[arg(long, conflicts_with = "init")]
    pub show: bool,

    /// Print a default configuration file
    #[arg(long)]
    pub init: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
