//! Logging setup for outdir
//!
//! - Structured logging with tracing (compact or JSON)
//! - Verbosity flags mapped onto an `EnvFilter`
//! - A per-process session id for correlating log lines
//! - Operation timing

use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Crates whose events the verbosity flags control
const OWN_TARGETS: [&str; 5] = [
    "outdir",
    "outdir_core",
    "outdir_layout",
    "outdir_gradle",
    "outdir_telemetry",
];

/// Initialize logging.
///
/// `RUST_LOG` always wins over the configured level.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .without_time()
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level for this tool's own crates
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the event target in compact output
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Map `-q` / `-v` flags onto a level
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let log_level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        Self {
            log_level: log_level.to_string(),
            show_target: verbose > 2,
            ..Self::default()
        }
    }

    /// Filter directive: dependencies stay at `warn`
    pub fn filter_directive(&self) -> String {
        let mut directive = String::from("warn");
        for target in OWN_TARGETS {
            directive.push_str(&format!(",{}={}", target, self.log_level));
        }
        directive
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis() as u64,
            "operation completed"
        );
        duration
    }
}

/// Run `f`, logging how long it took
pub fn timed<T>(name: &'static str, f: impl FnOnce() -> T) -> T {
    let _span = tracing::debug_span!("op", name).entered();
    let timer = Timer::start(name);
    let out = f();
    timer.stop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_stable() {
        assert_eq!(session_id(), session_id());
        assert_eq!(session_id().len(), 36);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(TelemetryConfig::from_verbosity(0, false).log_level, "warn");
        assert_eq!(TelemetryConfig::from_verbosity(1, false).log_level, "info");
        assert_eq!(TelemetryConfig::from_verbosity(2, false).log_level, "debug");
        assert_eq!(TelemetryConfig::from_verbosity(5, false).log_level, "trace");
        assert_eq!(TelemetryConfig::from_verbosity(3, true).log_level, "error");
    }

    #[test]
    fn test_filter_directive() {
        let directive = TelemetryConfig::from_verbosity(2, false).filter_directive();
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("outdir_layout=debug"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_timed_returns_value() {
        assert_eq!(timed("answer", || 42), 42);
    }
}
