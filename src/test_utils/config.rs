//! Configuration builders for tests.

use crate::config::{GwcConfig, InfluxConfig};

/// Builder for test GeoWebCache configurations.
#[derive(Debug)]
pub struct TestGwcConfigBuilder {
    target_url: String,
    scrape_timeout_seconds: f64,
}

impl TestGwcConfigBuilder {
    pub fn new() -> Self {
        Self {
            target_url: "http://test.local/geowebcache".to_string(),
            scrape_timeout_seconds: 2.0,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: f64) -> Self {
        self.scrape_timeout_seconds = seconds;
        self
    }

    pub fn build(self) -> GwcConfig {
        GwcConfig {
            target_url: self.target_url,
            scrape_timeout_seconds: self.scrape_timeout_seconds,
        }
    }
}

/// Builder for test InfluxDB configurations.
#[derive(Debug)]
pub struct TestInfluxConfigBuilder {
    url: String,
    org: String,
    token: String,
    bucket: String,
}

impl TestInfluxConfigBuilder {
    pub fn new() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            org: "test-org".to_string(),
            token: "test-token".to_string(),
            bucket: "test-bucket".to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn build(self) -> InfluxConfig {
        InfluxConfig {
            url: self.url,
            org: self.org,
            token: self.token,
            bucket: self.bucket,
        }
    }
}

/// Default GeoWebCache configuration pointing at a host that is never contacted.
pub fn test_gwc_config() -> GwcConfig {
    TestGwcConfigBuilder::new().build()
}

/// GeoWebCache configuration for a mock server URL.
pub fn test_gwc_config_with_url(url: impl Into<String>) -> GwcConfig {
    TestGwcConfigBuilder::new().with_url(url).build()
}

pub fn test_influx_config() -> InfluxConfig {
    TestInfluxConfigBuilder::new().build()
}

pub fn test_influx_config_with_url(url: impl Into<String>) -> InfluxConfig {
    TestInfluxConfigBuilder::new().with_url(url).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gwc_config_builder() {
        let config = TestGwcConfigBuilder::new()
            .with_url("http://gwc.local/geowebcache/home")
            .with_timeout_seconds(0.5)
            .build();

        assert_eq!(config.target_url, "http://gwc.local/geowebcache/home");
        assert_eq!(config.scrape_timeout_seconds, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_influx_config_builder() {
        let config = TestInfluxConfigBuilder::new()
            .with_url("http://influx.local")
            .with_bucket("my-bucket")
            .build();

        assert_eq!(config.url, "http://influx.local");
        assert_eq!(config.org, "test-org");
        assert_eq!(config.bucket, "my-bucket");
    }

    #[test]
    fn test_convenience_functions() {
        assert_eq!(test_gwc_config().target_url, "http://test.local/geowebcache");
        assert_eq!(
            test_gwc_config_with_url("http://mock.local").target_url,
            "http://mock.local"
        );
        assert_eq!(test_influx_config().url, "http://localhost:8086");
        assert_eq!(
            test_influx_config_with_url("http://mock:8086").url,
            "http://mock:8086"
        );
    }
}
