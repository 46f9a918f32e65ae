use chrono::{DateTime, Local};
use futures::future::join_all;
use influxdb2::models::DataPoint;

use super::traits::MetricCollector;

/// Collects metrics from multiple collectors concurrently.
///
/// Failed collections or conversions are logged and dropped; they never stop the
/// other collectors.
///
/// # Arguments
/// * `collectors` - Metric collectors to run
/// * `timestamp` - The timestamp to use for all collected metrics
pub async fn batch_collect_metrics<'a>(
    collectors: &[Box<dyn MetricCollector + 'a>],
    timestamp: DateTime<Local>,
) -> Vec<DataPoint> {
    let results = join_all(collectors.iter().map(|c| c.collect(timestamp))).await;

    results
        .into_iter()
        .filter_map(|res| match res {
            Ok(builders) => Some(builders),
            Err(e) => {
                tracing::error!("Failed to get metrics: {:?}", e);
                None
            }
        })
        .flatten()
        .filter_map(|p| match p.to_point() {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::error!("Failed to convert to point: {:?}", e);
                None
            }
        })
        .collect()
}
