//! Logging and in-process metrics for ZeroApp Builder
//!
//! - Structured logging with `tracing`, to stderr and optionally to a daily
//!   rolling JSON log file
//! - Build counters and duration histograms, exported as JSON by the server

mod metrics;

pub use metrics::{metrics, names, HistogramStats, MetricsRegistry, Timer};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// File name prefix of rolling log files
const LOG_FILE_PREFIX: &str = "zeroapp.log";

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `config.log_level`. When a log directory
/// is configured the returned guard must be kept alive for the lifetime of
/// the process, or buffered file output is lost.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow::anyhow!("Invalid log level {:?}: {}", config.log_level, e))?;

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("Failed to create log directory {}: {}", dir.display(), e))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .with_ansi(config.ansi)
                .compact(),
        )
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        log_dir = ?config.log_dir,
        "Telemetry initialized"
    );

    Ok(guard)
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory for daily rolling JSON logs
    pub log_dir: Option<PathBuf>,
    pub show_target: bool,
    /// Colour stderr output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            show_target: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Derive the filter from CLI flags: `--quiet` wins over `--verbose`
    pub fn with_verbosity(mut self, verbose: bool, quiet: bool) -> Self {
        if quiet {
            self.log_level = "warn".to_string();
        } else if verbose {
            self.log_level = "debug".to_string();
            self.show_target = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(session_id(), id);
    }

    #[test]
    fn test_verbosity() {
        let config = TelemetryConfig::default().with_verbosity(true, false);
        assert_eq!(config.log_level, "debug");
        assert!(config.show_target);

        let config = TelemetryConfig::default().with_verbosity(true, true);
        assert_eq!(config.log_level, "warn");

        let config = TelemetryConfig::default().with_verbosity(false, false);
        assert_eq!(config.log_level, "info");
    }
}
