//! Custom error types for the signal desk
//!
//! Missing optional data and unknown instruments are not errors; they are
//! defaulted inside the pipeline. Only malformed input and upstream
//! collaborator failures surface here.

use thiserror::Error;

/// A single raw signal could not be turned into a `RawSignal`.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Malformed signal: missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("Malformed signal: invalid direction `{value}` (expected Long or Short)")]
    InvalidDirection { value: String },

    #[error("Malformed signal: invalid {field} {value}")]
    InvalidPrice { field: &'static str, value: f64 },

    #[error("Malformed signal payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Metadata backend errors (instrument list, subscriptions, history fetch)
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Signal feed transport errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl SignalError {
    /// Short tag used in status lines and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalError::MissingField { .. } => "missing_field",
            SignalError::InvalidDirection { .. } => "invalid_direction",
            SignalError::InvalidPrice { .. } => "invalid_price",
            SignalError::Payload(_) => "payload",
        }
    }
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}
