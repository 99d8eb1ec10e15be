//! Logging setup for xmd.
//!
//! Uses the `tracing` ecosystem. Library code only emits events; the binary
//! installs a subscriber once through [`init_cli_logging`].
//!
//! # Usage
//!
//! ```rust
//! use xmd::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::default();
//! init_logging(&config);
//!
//! tracing::info!("Application started");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display.
    pub level: LogLevel,
    /// Output format for log messages.
    pub format: LogFormat,
    /// Include timestamps in log output.
    pub timestamps: bool,
    /// Include target (module path) in log output.
    pub target: bool,
    /// Enable ANSI colors in output.
    pub colors: bool,
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format.
    Pretty,
    /// Compact single-line format.
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            timestamps: false,
            target: false,
            colors: true,
        }
    }
}

impl LogConfig {
    /// Errors only.
    #[must_use]
    pub const fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            target: false,
            colors: true,
        }
    }

    /// Debug level with per-record events.
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            timestamps: true,
            target: true,
            colors: true,
        }
    }
}

impl LogLevel {
    /// Convert to env filter directive string.
    const fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "e" => Ok(Self::Error),
            "warn" | "warning" | "w" => Ok(Self::Warn),
            "info" | "i" => Ok(Self::Info),
            "debug" | "d" => Ok(Self::Debug),
            "trace" | "t" => Ok(Self::Trace),
            "off" | "none" | "quiet" => Ok(Self::Off),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set. Subsequent
/// calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("xmd={}", config.level.to_filter_string()))
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.colors)
                    .with_target(config.target),
            )
            .try_init()
            .ok(),
        (LogFormat::Pretty, false) => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.colors)
                    .with_target(config.target)
                    .without_time(),
            )
            .try_init()
            .ok(),
        (LogFormat::Compact, true) => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.colors)
                    .with_target(config.target),
            )
            .try_init()
            .ok(),
        (LogFormat::Compact, false) => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.colors)
                    .with_target(config.target)
                    .without_time(),
            )
            .try_init()
            .ok(),
    };
}

/// Pick the CLI logging preset. An explicit `level` replaces the preset's
/// level but keeps its format.
#[must_use]
pub fn cli_log_config(quiet: bool, verbose: bool, level: Option<LogLevel>) -> LogConfig {
    let mut config = if quiet {
        LogConfig::quiet()
    } else if verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    if let Some(level) = level {
        config.level = level;
    }
    config
}

/// Initialize logging with defaults suitable for CLI use.
///
/// Logs go to stderr; stdout carries the export plan and summary.
pub fn init_cli_logging(quiet: bool, verbose: bool, level: Option<LogLevel>) {
    init_logging(&cli_log_config(quiet, verbose, level));
}

/// Logs the start and end of an operation with its duration.
pub struct OperationGuard {
    name: String,
    start: std::time::Instant,
}

impl OperationGuard {
    /// Start tracking an operation.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::info!(operation = %name, "Starting operation");
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }

    /// Complete the operation successfully.
    pub fn complete(self) {
        tracing::info!(
            operation = %self.name,
            duration_ms = self.start.elapsed().as_millis(),
            "Operation completed"
        );
    }

    /// Mark the operation as failed.
    pub fn fail(self, error: &dyn std::error::Error) {
        tracing::error!(
            operation = %self.name,
            duration_ms = self.start.elapsed().as_millis(),
            error = %error,
            "Operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("I".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(LogConfig::default().level, LogLevel::Warn);
        assert_eq!(LogConfig::quiet().level, LogLevel::Error);
        assert_eq!(LogConfig::verbose().level, LogLevel::Debug);
        assert_eq!(LogConfig::verbose().format, LogFormat::Pretty);
    }

    #[test]
    fn test_explicit_level_overrides_preset() {
        let config = cli_log_config(false, true, Some(LogLevel::Trace));
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Pretty);

        assert_eq!(cli_log_config(true, false, None).level, LogLevel::Error);
        assert_eq!(
            cli_log_config(false, false, Some(LogLevel::Info)).level,
            LogLevel::Info
        );
    }

    #[test]
    fn test_log_level_filter_string() {
        assert_eq!(LogLevel::Debug.to_filter_string(), "debug");
        assert_eq!(LogLevel::Off.to_filter_string(), "off");
    }
}
