//! Structured logging setup
//!
//! Logs go to stderr so that stdout carries only the computed models. The
//! filter honors `RUST_LOG`; on top of it the `wtpgen` target is set to the
//! configured level. Initialization happens at most once per process.
//!
//! ```no_run
//! use wtpgen::util::logging::{self, LoggingConfig};
//! use tracing::Level;
//!
//! logging::init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::debug!(project = ":web", "Resolving descriptors");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const DEFAULT_LEVEL: Level = Level::INFO;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,

    /// One JSON object per line instead of human-readable output
    pub use_json: bool,

    pub include_target: bool,

    /// File and line of the log call
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with location and thread metadata
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self::with_level(Level::DEBUG)
    }

    /// Reads `WTPGEN_LOG_LEVEL` and `WTPGEN_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("WTPGEN_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(DEFAULT_LEVEL);

        let use_json = env::var("WTPGEN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

pub fn try_parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Like [`try_parse_level`], falling back to INFO with a notice on stderr
pub fn parse_level(level_str: &str) -> Level {
    try_parse_level(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
            level_str
        );
        DEFAULT_LEVEL
    })
}

/// Level implied by command-line flags. An explicit level wins, then `quiet`
/// (errors only), then each `verbose` step (debug, then trace).
pub fn level_from_flags(explicit: Option<&str>, verbose: u8, quiet: bool, fallback: Level) -> Level {
    if let Some(level) = explicit {
        return parse_level(level);
    }
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => fallback,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = format!("wtpgen={}", config.level).parse() {
            filter = filter.add_directive(directive);
        }

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
