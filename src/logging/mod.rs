//! Logging infrastructure - structured tracing for the bridge
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Zero-cost when no subscriber is installed (the host may bring its own)
//! - Events only on cold paths (dispose, underflow)
//! - Optional console or file output configured from the environment

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn, Level};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the non-blocking file writer flushing for the life of the process
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path; console (stderr) when `None`
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup (environment, tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // SKREF_LOG_LEVEL: trace, debug, info, warn, error
        if let Some(level_str) = lookup("SKREF_LOG_LEVEL") {
            config.level = parse_level(&level_str).unwrap_or(config.level);
        }

        // SKREF_LOG_FILE: path to log file
        config.log_path = lookup("SKREF_LOG_FILE").filter(|path| !path.is_empty());

        // SKREF_LOG_JSON: enable JSON format
        config.json_format = lookup("SKREF_LOG_JSON").is_some_and(|v| is_truthy(&v));

        // SKREF_LOG_SPANS: show span events
        config.show_spans = lookup("SKREF_LOG_SPANS").is_some_and(|v| is_truthy(&v));

        config
    }

    /// Create debug config (verbose logging, every dispose traced)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn is_truthy(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "" | "1" | "true" | "yes" | "on")
}

/// Initialize logging with default configuration
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. If the host process already
/// installed a global subscriber, that one is kept.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "skref_bridge={}",
                config.level.as_str().to_lowercase()
            ))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        // An unusable log file must not take the host down; use the console
        let mut file_error = None;
        let output = match config.log_path.as_deref() {
            Some(path) => file_layer(Path::new(path), config.json_format, span_events.clone())
                .unwrap_or_else(|err| {
                    file_error = Some((path.to_string(), err));
                    console_layer(config.json_format, span_events)
                }),
            None => console_layer(config.json_format, span_events),
        };

        let installed = tracing_subscriber::registry()
            .with(output)
            .with(env_filter)
            .try_init();

        if installed.is_err() {
            debug!("global tracing subscriber already set, keeping it");
        }

        if let Some((path, err)) = file_error {
            warn!(path = %path, error = %err, "cannot open log file, logging to stderr");
        }
    });
}

fn console_layer(json: bool, span_events: FmtSpan) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_span_events(span_events)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

fn file_layer(
    path: &Path,
    json: bool,
    span_events: FmtSpan,
) -> Result<Box<dyn Layer<Registry> + Send + Sync>, InitError> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "skref_bridge.log".to_string());

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_span_events(span_events)
        .with_target(true)
        .with_thread_ids(true);

    Ok(if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    })
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.level, Level::WARN);
        assert!(config.log_path.is_none());
        assert!(!config.json_format);
        assert!(!config.show_spans);

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
    }

    #[test]
    fn test_config_from_vars() {
        let config = config_from(&[
            ("SKREF_LOG_LEVEL", "Trace"),
            ("SKREF_LOG_FILE", "/tmp/skref.log"),
            ("SKREF_LOG_JSON", "1"),
            ("SKREF_LOG_SPANS", "off"),
        ]);
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/skref.log"));
        assert!(config.json_format);
        assert!(!config.show_spans);
    }

    #[test]
    fn test_unknown_level_keeps_default() {
        let config = config_from(&[("SKREF_LOG_LEVEL", "loud"), ("SKREF_LOG_FILE", "")]);
        assert_eq!(config.level, Level::WARN);
        assert!(config.log_path.is_none());
    }

    #[test]
    fn test_file_layer_rejects_unusable_path() {
        // A regular file cannot be a log directory
        let result = file_layer(Path::new("/etc/passwd/nested/skref.log"), false, FmtSpan::NONE);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_idempotent() {
        init_with_config(LogConfig::default());
        init(); // Should not panic
        assert!(is_initialized());
    }
}
