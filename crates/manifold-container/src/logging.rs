//! Structured logging with tracing
//!
//! The engine only emits `tracing` events; initialization is for binaries
//! and test harnesses. Configuration mirrors the rest of the workspace:
//! an explicit level with an environment override through `MANIFOLD_LOG`.

use manifold_domain::{Error, Result};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level directive (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON-structured output instead of human-readable lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Initialize logging with the provided configuration
///
/// The `MANIFOLD_LOG` environment variable overrides the configured level
/// when set. Fails when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_env("MANIFOLD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = Registry::default().with(filter);
    let result = if config.json_format {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| Error::internal(format!("failed to initialize logging: {e}")))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Parse a log level string to a tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::internal(format!(
            "invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}
