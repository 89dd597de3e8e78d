//! Telemetry configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::TelemetryError;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines for development
    #[default]
    Text,
    /// One JSON object per line for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::Config(format!(
                "unknown log format {other:?}, expected text or json"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// `EnvFilter` directive, e.g. `info` or `qc_txapp=debug,info`
    pub log_level: String,

    pub format: LogFormat,

    /// Include file and line in JSON output
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "quantum-chain".to_string(),
            log_level: "info".to_string(),
            format: LogFormat::Text,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_SERVICE_NAME`: Service name (default: quantum-chain)
    /// - `QC_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `QC_LOG_FORMAT`: `text` or `json` (default: text)
    /// - `QC_JSON_LOGS`: legacy switch, `true`/`1` selects json when
    ///   `QC_LOG_FORMAT` is unset
    pub fn from_env() -> Result<Self, TelemetryError> {
        let defaults = Self::default();

        let format = match env::var("QC_LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => match env::var("QC_JSON_LOGS") {
                Ok(v) if v.eq_ignore_ascii_case("true") || v == "1" => LogFormat::Json,
                _ => LogFormat::Text,
            },
        };

        Ok(Self {
            service_name: env::var("QC_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: env::var("QC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            with_source_location: format == LogFormat::Json,
            format,
        })
    }

    /// Configuration for a named component, e.g. `txapp`.
    pub fn for_component(component: &str) -> Result<Self, TelemetryError> {
        let mut config = Self::from_env()?;
        config.service_name = format!("{}-{}", config.service_name, component);
        Ok(config)
    }
}
