use crate::error::ConfigError;
use anyhow::{anyhow, Context, Result};
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", err)),
    }
}

fn default_interval_sec() -> u64 {
    15
}

fn default_task_timeout_seconds() -> u64 {
    30
}

#[derive(Deserialize, Debug)]
pub struct CollectorConfig {
    #[serde(default = "default_interval_sec")]
    pub interval_sec: u64,
    // upper bound on one poll-and-write cycle
    #[serde(default = "default_task_timeout_seconds")]
    pub task_timeout_seconds: u64,
}

pub fn load_collector_config() -> Result<CollectorConfig> {
    match envy::prefixed("COLLECTOR_").from_env::<CollectorConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load CollectorConfig: {}", err)),
    }
}

fn default_target_url() -> String {
    "http://127.0.0.1:8080/geowebcache".to_string()
}

fn default_scrape_timeout_seconds() -> f64 {
    5.0
}

/// Where the status page lives and how long a single retrieval may take.
#[derive(Deserialize, Debug, Clone)]
pub struct GwcConfig {
    #[serde(default = "default_target_url")]
    pub target_url: String,
    #[serde(default = "default_scrape_timeout_seconds")]
    pub scrape_timeout_seconds: f64,
}

impl GwcConfig {
    /// Rejects an empty target and a timeout that is not a positive, finite duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_url.trim().is_empty() {
            return Err(ConfigError::invalid("GWC_TARGET_URL", "must not be empty"));
        }
        if !self.scrape_timeout_seconds.is_finite() || self.scrape_timeout_seconds <= 0.0 {
            return Err(ConfigError::invalid(
                "GWC_SCRAPE_TIMEOUT_SECONDS",
                format!("must be positive, got {}", self.scrape_timeout_seconds),
            ));
        }
        Ok(())
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.scrape_timeout_seconds)
    }
}

pub(crate) fn load_gwc_config() -> Result<GwcConfig> {
    let config = envy::prefixed("GWC_")
        .from_env::<GwcConfig>()
        .map_err(ConfigError::env_parse)
        .context("Failed to load GwcConfig")?;
    config.validate().context("Failed to load GwcConfig")?;
    Ok(config)
}

#[derive(Deserialize, Debug)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

pub fn load_influx_config() -> Result<InfluxConfig> {
    match envy::prefixed("INFLUXDB_").from_env::<InfluxConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load InfluxConfig: {}", err)),
    }
}
