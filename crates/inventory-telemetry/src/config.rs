//! Telemetry configuration from environment variables.

use std::env;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to colour plain output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "stockroom".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STOCKROOM_SERVICE_NAME`: Service name (default: stockroom)
    /// - `STOCKROOM_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `STOCKROOM_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `NO_COLOR`: Disable ANSI colours when set
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("STOCKROOM_SERVICE_NAME")
                .unwrap_or_else(|_| "stockroom".to_string()),

            log_level: env::var("STOCKROOM_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("STOCKROOM_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            ansi: env::var("NO_COLOR").is_err(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
