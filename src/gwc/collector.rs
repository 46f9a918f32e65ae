use crate::error::CollectorError;
use crate::model::{snapshot_metrics, DataPointBuilder, MetricCollector};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

use super::client::Client;
use super::rules::Schema;
use super::snapshot::Scrape;

/// Polls one GeoWebCache instance and renders the result.
///
/// Never fails: an unreachable page still produces `gwc_up = 0`.
pub struct GwcMetricCollector {
    client: Arc<Client>,
    schema: Arc<Schema>,
}

impl GwcMetricCollector {
    pub fn new(client: Arc<Client>, schema: Arc<Schema>) -> Self {
        Self { client, schema }
    }
}

#[async_trait]
impl MetricCollector for GwcMetricCollector {
    async fn collect(
        &self,
        timestamp: DateTime<Local>,
    ) -> Result<Vec<Box<dyn DataPointBuilder>>, CollectorError> {
        let scrape = self.client.scrape(&self.schema).await;

        if let Scrape::Up(snapshot) = &scrape {
            let health = snapshot.health;
            if health.matched == 0 {
                tracing::warn!(
                    target_url = %self.client.target_url(),
                    known = health.known,
                    "status page reachable but no field matched"
                );
            } else {
                tracing::debug!(
                    matched = health.matched,
                    known = health.known,
                    "schema health"
                );
            }
        }

        Ok(snapshot_metrics(&scrape, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::config::test_gwc_config_with_url;
    use crate::test_utils::fixtures::status_page;

    async fn collector_for(server: &mockito::ServerGuard) -> GwcMetricCollector {
        let client = Client::new(test_gwc_config_with_url(format!(
            "{}/geowebcache",
            server.url()
        )));
        GwcMetricCollector::new(Arc::new(client), Arc::new(Schema::new().unwrap()))
    }

    mod succeeds {
        use super::*;

        #[tokio::test]
        async fn test_collect_full_page() {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("GET", "/geowebcache")
                .with_status(200)
                .with_body(status_page())
                .create_async()
                .await;

            let collector = collector_for(&server).await;
            let metrics = collector.collect(Local::now()).await.unwrap();

            assert_eq!(metrics.len(), 23);
            assert!(metrics.iter().all(|m| m.to_point().is_ok()));
        }

        #[tokio::test]
        async fn test_collect_unrecognized_page() {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("GET", "/geowebcache")
                .with_status(200)
                .with_body("<html><body>Maintenance</body></html>")
                .create_async()
                .await;

            let collector = collector_for(&server).await;
            let metrics = collector.collect(Local::now()).await.unwrap();

            // up, memcache and schema health
            assert_eq!(metrics.len(), 3);
        }
    }

    mod fails {
        use super::*;

        #[tokio::test]
        async fn test_collect_down_is_not_an_error() {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("GET", "/geowebcache")
                .with_status(502)
                .create_async()
                .await;

            let collector = collector_for(&server).await;
            let metrics = collector.collect(Local::now()).await.unwrap();

            assert_eq!(metrics.len(), 1);
            let point = format!("{:?}", metrics[0].to_point().unwrap());
            assert!(point.contains("gwc_up"));
        }
    }
}
