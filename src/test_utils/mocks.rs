//! Mock collectors, data points and servers for tests.

use crate::error::{CollectorError, StorageError};
use crate::model::metrics::UpMetric;
use crate::model::{DataPointBuilder, MetricCollector};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use influxdb2::models::DataPoint;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A collector that can be configured to succeed or fail.
pub struct MockMetricCollector {
    failure: Option<String>,
    create_data: Box<dyn Fn() -> Vec<Box<dyn DataPointBuilder>> + Send + Sync>,
}

impl MockMetricCollector {
    /// Succeeds with a single `gwc_up = 1` point.
    pub fn new_success() -> Self {
        Self::new_with_data(|| {
            vec![Box::new(UpMetric {
                up: true,
                timestamp: Local::now(),
            })]
        })
    }

    /// Fails as if the named task had timed out.
    pub fn new_failure(name: impl Into<String>) -> Self {
        Self {
            failure: Some(name.into()),
            create_data: Box::new(Vec::new),
        }
    }

    pub fn new_with_data<F>(create_fn: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn DataPointBuilder>> + Send + Sync + 'static,
    {
        Self {
            failure: None,
            create_data: Box::new(create_fn),
        }
    }
}

#[async_trait]
impl MetricCollector for MockMetricCollector {
    async fn collect(
        &self,
        _timestamp: DateTime<Local>,
    ) -> Result<Vec<Box<dyn DataPointBuilder>>, CollectorError> {
        match &self.failure {
            Some(name) => Err(CollectorError::timeout(name.clone(), 0)),
            None => Ok((self.create_data)()),
        }
    }
}

/// A data point builder whose conversion always fails.
pub struct FailingDataPointBuilder;

impl DataPointBuilder for FailingDataPointBuilder {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        Err(StorageError::InvalidDataPoint(
            "intentional failure".to_string(),
        ))
    }
}

/// Starts an InfluxDB stand-in that accepts writes with the given status.
pub async fn mock_influx_write(status: u16, expected_writes: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_writes)
        .mount(&server)
        .await;
    server
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success_collector() {
        let collector = MockMetricCollector::new_success();
        let data = collector.collect(Local::now()).await.unwrap();
        assert_eq!(data.len(), 1);
        assert!(data[0].to_point().is_ok());
    }

    #[tokio::test]
    async fn test_mock_failure_collector() {
        let collector = MockMetricCollector::new_failure("test_collector");
        let Err(err) = collector.collect(Local::now()).await else {
            panic!("failure collector returned data");
        };
        assert!(matches!(err, CollectorError::Timeout { .. }));
        assert!(err.to_string().contains("test_collector"));
    }

    #[test]
    fn test_failing_data_point_builder() {
        assert!(FailingDataPointBuilder.to_point().is_err());
    }

    #[tokio::test]
    async fn test_mock_influx_write() {
        let server = mock_influx_write(204, 0).await;
        assert!(server.uri().starts_with("http://"));
    }
}
