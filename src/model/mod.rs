//! Metric traits and the InfluxDB rendering of a scrape.
//!
//! A [`Scrape`](crate::gwc::Scrape) is turned into [`DataPointBuilder`]s, one per
//! measurement row, which are converted into InfluxDB data points when written.

pub mod metrics;
pub mod traits;
pub mod types;
pub mod utilities;

pub use metrics::snapshot_metrics;
pub use traits::{DataPointBuilder, MetricCollector};
pub use utilities::batch_collect_metrics;
