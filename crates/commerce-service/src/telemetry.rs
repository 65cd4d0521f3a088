//! # Telemetry
//!
//! Tracing subscriber setup shared by every binary.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages everywhere
//! - `RUST_LOG=commerce=trace` - Trace for commerce crates only
//! - Default: `info,commerce=debug,sqlx=warn`
//!
//! `RUST_LOG` always wins over the configured filter.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor `logging.filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,commerce=debug,sqlx=warn";

/// Builds the filter: `RUST_LOG` first, then `configured`, then the default.
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        configured
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    })
}

/// Initializes the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(configured: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(configured))
        .with_target(true)
        .try_init();
}
