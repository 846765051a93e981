//! Telemetry configuration loaded via OrthoConfig.
//!
//! The library itself is configured in code ([`crate::ServiceOptions`] and the
//! diagnostic sink); these settings only drive subscriber set-up in binaries.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

const DEFAULT_LOG_FILTER: &str = "info";

/// Logging settings read from `CRUDKIT_*` variables, config files and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRUDKIT")]
pub struct TelemetrySettings {
    /// Emit JSON log lines instead of human-readable output.
    #[ortho_config(default = false)]
    pub json_logs: bool,
    /// Filter directive; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl TelemetrySettings {
    /// Build the subscriber filter.
    ///
    /// # Errors
    /// Returns [`ParseError`] when the configured directive is malformed.
    pub fn env_filter(&self) -> Result<EnvFilter, ParseError> {
        self.log_filter.as_deref().map_or_else(
            || {
                Ok(EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
            },
            EnvFilter::try_new,
        )
    }
}
