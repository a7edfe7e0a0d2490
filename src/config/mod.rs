//! Configuration module for the replay tool.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON scenario to replay
    pub scenario_path: PathBuf,
    /// Where to write the report; stdout when unset
    pub output_path: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Pretty-print the JSON report
    pub pretty: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let scenario_path = env::var("HOSTS_SCENARIO_PATH")
            .unwrap_or_else(|_| "./scenario.json".to_string())
            .into();

        let output_path = env::var("HOSTS_OUTPUT_PATH").ok().map(PathBuf::from);

        let log_level = env::var("HOSTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("HOSTS_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Text);

        let pretty = env::var("HOSTS_PRETTY")
            .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
            .unwrap_or(true);

        Self {
            scenario_path,
            output_path,
            log_level,
            log_format,
            pretty,
        }
    }
}
