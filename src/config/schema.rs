//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the registrar.
//! All types derive Serde traits for deserialization from the settings file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the registrar.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistrarConfig {
    /// InfluxDB endpoint and credentials.
    pub influx: InfluxConfig,

    /// Telegraf configuration source and registration metadata.
    pub telegraf: TelegrafConfig,

    /// Readiness gate settings.
    pub readiness: ReadinessConfig,

    /// Registration submission settings.
    pub submission: SubmissionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// InfluxDB connection configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InfluxConfig {
    /// Base URL of the InfluxDB HTTP API (e.g., "http://influxdb:8086").
    pub base_url: String,

    /// Organization the Telegraf configuration is created in.
    pub org: String,

    /// API token. Only ever resolved from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            base_url: "http://influxdb:8086".to_string(),
            org: "home".to_string(),
            token: None,
        }
    }
}

impl InfluxConfig {
    /// Join `path` onto the base URL, keeping any path prefix the base has.
    pub fn endpoint(&self, path: &str) -> Result<url::Url, url::ParseError> {
        let base = self.base_url.trim_end_matches('/');
        url::Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
    }
}

impl std::fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("base_url", &self.base_url)
            .field("org", &self.org)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Telegraf configuration source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegrafConfig {
    /// Path to the rendered telegraf.conf.
    pub conf_path: PathBuf,

    /// Registration name shown in the InfluxDB UI.
    pub name: String,

    /// Registration description.
    pub description: String,
}

impl Default for TelegrafConfig {
    fn default() -> Self {
        Self {
            conf_path: PathBuf::from("/etc/telegraf/telegraf.conf"),
            name: "telegraf-from-compose".to_string(),
            description: "Telegraf config imported from compose".to_string(),
        }
    }
}

/// Readiness gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Path to probe, relative to the base URL.
    pub path: String,

    /// Number of probes before giving up.
    pub max_attempts: u32,

    /// Pause between probes in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
            max_attempts: 30,
            interval_ms: 1000,
            timeout_secs: 5,
        }
    }
}

/// Delay strategy between submission attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// Doubling delay with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Registration submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Maximum number of POST attempts.
    pub max_attempts: u32,

    /// Delay before each retry in milliseconds.
    pub delay_ms: u64,

    /// Upper bound for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Delay strategy.
    pub backoff: BackoffKind,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Treat 4xx responses as permanent instead of retrying them.
    pub fail_fast_on_client_error: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay_ms: 2000,
            max_delay_ms: 30_000,
            backoff: BackoffKind::Fixed,
            timeout_secs: 10,
            fail_fast_on_client_error: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}
