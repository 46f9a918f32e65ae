//! Error types for the GeoWebCache to InfluxDB2 forwarder.
//!
//! Only two failure tiers exist at runtime. A fetch failure marks the target as down
//! for one poll, and a field that cannot be extracted simply resolves to its default.
//! The typed errors below carry the detail that gets logged for operators.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Status page retrieval errors
    #[error("fetch error")]
    Fetch(#[from] FetchError),

    /// Metric collection errors
    #[error("collector error")]
    Collector(#[from] CollectorError),

    /// InfluxDB storage errors
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// An extraction rule failed to compile
    #[error("invalid extraction rule")]
    Schema(#[from] regex::Error),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Reasons a single retrieval of the status page failed.
///
/// All variants collapse into the same "down" outcome for the caller; the variant
/// only matters for the log line.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The whole request did not finish in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Server answered with something other than 200
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body could not be read to the end
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Metric collection errors.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Collector task timed out
    #[error("collector '{name}' timed out after {timeout} seconds")]
    Timeout { name: String, timeout: u64 },
}

/// InfluxDB storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// InfluxDB client error
    #[error("InfluxDB error: {0}")]
    Client(#[from] influxdb2::RequestError),

    /// Invalid data point
    #[error("invalid data point: {0}")]
    InvalidDataPoint(String),
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Classifies a transport error raised while sending the request.
    pub fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(err)
        }
    }

    /// Classifies an error raised while draining the response body.
    pub fn from_body(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Body(err)
        }
    }

    /// Creates a non-200 status error.
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status(status.as_u16())
    }
}

impl CollectorError {
    /// Creates a timeout error.
    pub fn timeout(name: impl Into<String>, timeout: u64) -> Self {
        Self::Timeout {
            name: name.into(),
            timeout,
        }
    }
}
