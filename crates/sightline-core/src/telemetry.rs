//! Logging initialisation.
//!
//! The subscriber is only compiled in with the `telemetry` feature so that
//! library crates never install a global subscriber by accident.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::SightlineResult;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,sightline=debug,tower_http=debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-field lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything other than `json` is pretty.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when present.
#[cfg(feature = "telemetry")]
pub fn init_logging(default_filter: &str, format: LogFormat) -> SightlineResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| crate::SightlineError::Internal(format!("Failed to install subscriber: {}", e)))
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_default_filter: &str, _format: LogFormat) -> SightlineResult<()> {
    Ok(())
}
