use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the metadata service (instruments, subscriptions, history)
    pub base_url: String,
    /// Websocket endpoint of the signal feed
    pub feed_url: String,
    pub request_timeout_secs: u64,
    pub reconnect_delay_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            feed_url: "ws://localhost:3000/signals".to_string(),
            request_timeout_secs: 10,
            reconnect_delay_secs: 5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub retention_window_ms: i64,
    pub message_limit: usize,
    /// Newest enriched signals kept for display; None keeps all
    pub signal_limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retention_window_ms: constants::history::RETENTION_WINDOW_MS,
            message_limit: 200,
            signal_limit: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub pipeline: PipelineConfig,

    /// Scan interval pushed to the backend on startup
    pub interval_ms: u64,
    /// "NAME (token)" labels to subscribe on startup
    pub symbols: Vec<String>,
    /// Cron expression for refreshing the instrument list; None disables it
    pub instrument_refresh_cron: Option<String>,

    pub api_bind: String,
    pub bus_capacity: usize,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            pipeline: PipelineConfig::default(),
            interval_ms: 60_000,
            symbols: Vec::new(),
            instrument_refresh_cron: Some("0 */15 * * * *".to_string()),
            api_bind: "0.0.0.0:4000".to_string(),
            bus_capacity: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `config.yaml`, or the file named by `SIGNAL_DESK_CONFIG`.
    /// A missing default file falls back to built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("SIGNAL_DESK_CONFIG") {
            Ok(path) => Self::load_from(path),
            Err(_) if Path::new("config.yaml").exists() => Self::load_from("config.yaml"),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        serde_yaml::from_str(content)
    }
}
