//! Configuration system for xmd.
//!
//! Settings come from several layers, lowest priority first:
//!
//! 1. **Compiled defaults**
//! 2. **Config file** - `--config <path>`, else `./xmd.toml`, else
//!    `~/.config/xmd/config.toml`
//! 3. **Environment variables** - `XMD_*` prefix
//! 4. **CLI arguments** - applied by the binary, always win
//!
//! The result is one [`Config`] value that is handed to the exporter.
//!
//! # Example Configuration File
//!
//! ```toml
//! archive = "twitter-archive/data/tweets.js"
//! output_dir = "vault/Tweets"
//! users_dir = "vault/People"
//!
//! [properties]
//! include_retweets = false
//! create_user_files = true
//! detect_duplicates = false
//! ```

use crate::error::{
    Result, VALID_PROPERTY_KEYS, XmdError, find_closest_match, format_did_you_mean,
};
use crate::model::RenderOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "xmd.toml";

/// Default output directory for tweet files.
pub const DEFAULT_OUTPUT_DIR: &str = "tweets";

/// Default directory for per-user backlink files.
pub const DEFAULT_USERS_DIR: &str = "users";

/// Main configuration structure for xmd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tweets file or extracted archive directory.
    /// Environment variable: `XMD_ARCHIVE`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,

    /// Base directory of the `YYYY/MM/DD/<id>.md` tree.
    /// Environment variable: `XMD_OUTPUT_DIR`
    pub output_dir: PathBuf,

    /// Directory of per-user backlink files.
    /// Environment variable: `XMD_USERS_DIR`
    pub users_dir: PathBuf,

    /// Output toggles.
    pub properties: PropertiesConfig,
}

/// The `[properties]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PropertiesConfig {
    #[serde(flatten)]
    pub options: RenderOptions,

    /// Keys that are not recognized; reported, then ignored.
    #[serde(flatten, skip_serializing)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            users_dir: PathBuf::from(DEFAULT_USERS_DIR),
            properties: PropertiesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the file layer and the environment.
    ///
    /// An explicit `path` must exist and parse; the implicit locations are
    /// skipped when absent.
    ///
    /// # Errors
    /// Returns [`XmdError::ConfigError`] when a config file cannot be read
    /// or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => Self::load_from_file(explicit)?,
            None => match Self::discover() {
                Some(found) => Self::load_from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.warn_unknown_properties();

        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    /// Returns [`XmdError::ConfigError`] when the file cannot be read or is
    /// not valid TOML for this structure.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| XmdError::ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|reason| XmdError::ConfigError {
            path: path.to_path_buf(),
            reason,
        })?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns the TOML error message.
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Implicit config locations, in lookup order.
    #[must_use]
    pub fn candidate_paths() -> Vec<PathBuf> {
        std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE))
            .chain(Self::user_config_path())
            .collect()
    }

    /// First config file found in the implicit locations.
    fn discover() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.is_file())
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xmd").join("config.toml"))
    }

    /// Apply `XMD_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(archive) = lookup("XMD_ARCHIVE") {
            self.archive = Some(PathBuf::from(archive));
        }
        if let Some(output_dir) = lookup("XMD_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }
        if let Some(users_dir) = lookup("XMD_USERS_DIR") {
            self.users_dir = PathBuf::from(users_dir);
        }

        let options = &mut self.properties.options;
        for (var, slot) in [
            ("XMD_INCLUDE_RETWEETS", &mut options.include_retweets),
            ("XMD_CREATE_USER_FILES", &mut options.create_user_files),
            ("XMD_DETECT_DUPLICATES", &mut options.detect_duplicates),
        ] {
            if let Some(raw) = lookup(var) {
                match parse_env_bool(&raw) {
                    Some(value) => *slot = value,
                    None => warn!(var, value = %raw, "Ignoring non-boolean environment value"),
                }
            }
        }
    }

    /// Log a warning, with a suggestion when one is close, per unknown key.
    fn warn_unknown_properties(&self) {
        for key in self.properties.unknown.keys() {
            match find_closest_match(key, VALID_PROPERTY_KEYS, None) {
                Some(closest) => warn!(
                    "Unknown property '{key}' ignored. {}",
                    format_did_you_mean(closest)
                ),
                None => warn!(
                    "Unknown property '{key}' ignored. Valid properties: {}",
                    VALID_PROPERTY_KEYS.join(", ")
                ),
            }
        }
    }

    /// The render toggles.
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        self.properties.options
    }

    /// Archive location, required to run an export.
    ///
    /// # Errors
    /// Returns [`XmdError::MissingSetting`] when no layer provided one.
    pub fn archive_path(&self) -> Result<&Path> {
        self.archive
            .as_deref()
            .ok_or(XmdError::MissingSetting { key: "archive" })
    }

    /// Render the configuration as TOML.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Generate a default configuration file content.
    #[must_use]
    pub fn default_config_content() -> String {
        let config = Self {
            archive: Some(PathBuf::from(crate::parser::TWEETS_FILE)),
            ..Self::default()
        };
        config.to_toml()
    }
}

fn parse_env_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
