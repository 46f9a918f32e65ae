use crate::error::{Result, StorageError};
use crate::gwc::{
    BuildInfo, Field, MemoryCacheStats, SchemaHealth, Scrape, Snapshot, StorageInfo, WindowStats,
};
use chrono::{DateTime, Local};
use influxdb2::models::DataPoint;

use super::traits::DataPointBuilder;
use super::types::{Measurement, MetricValue};

fn timestamp_nanos(timestamp: &DateTime<Local>) -> Result<i64, StorageError> {
    timestamp
        .timestamp_nanos_opt()
        .ok_or_else(|| StorageError::InvalidDataPoint("Timestamp overflow".to_string()))
}

fn to_i64(name: &str, value: u64) -> Result<i64, StorageError> {
    i64::try_from(value)
        .map_err(|_| StorageError::InvalidDataPoint(format!("{} out of range: {}", name, value)))
}

/// Liveness of the status page for one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct UpMetric {
    pub up: bool,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for UpMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        DataPoint::builder(Measurement::Up.to_string().as_str())
            .field("value", i64::from(self.up))
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build UpMetric: {}", e))
            })
    }
}

/// A single page-level scalar, tagged with its stable name.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMetric {
    pub name: &'static str,
    pub value: MetricValue,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for StatusMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let builder = DataPoint::builder(Measurement::Status.to_string().as_str())
            .tag("metric", self.name);
        let builder = match &self.value {
            MetricValue::Integer(v) => builder.field("value", to_i64(self.name, *v)?),
            MetricValue::Float(v) => builder.field("value", *v),
            MetricValue::Timestamp(t) => builder.field("value", t.timestamp()),
        };
        builder
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build StatusMetric: {}", e))
            })
    }
}

/// One rolling window row. Only the sub-values that were found become fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalMetric {
    pub stats: WindowStats,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for IntervalMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let mut builder = DataPoint::builder(Measurement::Interval.to_string().as_str())
            .tag("window", self.stats.window.label());
        if let Some(requests) = self.stats.requests {
            builder = builder.field("requests", to_i64("requests", requests)?);
        }
        if let Some(rate) = self.stats.rate_per_second {
            builder = builder.field("rate_per_second", rate);
        }
        if let Some(bytes) = self.stats.bytes {
            builder = builder.field("bytes", to_i64("bytes", bytes)?);
        }
        if let Some(bandwidth) = self.stats.bandwidth_mbps {
            builder = builder.field("bandwidth_mbps", bandwidth);
        }
        builder
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build IntervalMetric: {}", e))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageMetric {
    pub storage: StorageInfo,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for StorageMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let mut builder = DataPoint::builder(Measurement::Storage.to_string().as_str());
        if let Some(config_file) = &self.storage.config_file {
            builder = builder.field("config_file", config_file.clone());
        }
        if let Some(local_storage) = &self.storage.local_storage {
            builder = builder.field("local_storage", local_storage.clone());
        }
        builder
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build StorageMetric: {}", e))
            })
    }
}

/// Info-style point: the strings live in tags and the value is always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfoMetric {
    pub build: BuildInfo,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for BuildInfoMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        DataPoint::builder(Measurement::Build.to_string().as_str())
            .tag("version", self.build.version.clone())
            .tag("build", self.build.build.clone())
            .field("value", 1i64)
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build BuildInfoMetric: {}", e))
            })
    }
}

/// The in-memory cache block. Always carries every field, zeros included.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCacheMetric {
    pub stats: MemoryCacheStats,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for MemoryCacheMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let s = &self.stats;
        DataPoint::builder(Measurement::MemoryCache.to_string().as_str())
            .field("present", s.present)
            .field("requests_total", to_i64("requests_total", s.requests_total)?)
            .field("hit_count_total", to_i64("hit_count_total", s.hit_count_total)?)
            .field("miss_count_total", to_i64("miss_count_total", s.miss_count_total)?)
            .field("hit_ratio_percent", s.hit_ratio_percent)
            .field("miss_ratio_percent", s.miss_ratio_percent)
            .field(
                "evicted_tiles_total",
                to_i64("evicted_tiles_total", s.evicted_tiles_total)?,
            )
            .field("occupation_percent", s.occupation_percent)
            .field(
                "actual_size_bytes",
                to_i64("actual_size_bytes", s.actual_size_bytes)?,
            )
            .field(
                "total_size_bytes",
                to_i64("total_size_bytes", s.total_size_bytes)?,
            )
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build MemoryCacheMetric: {}", e))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaHealthMetric {
    pub health: SchemaHealth,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for SchemaHealthMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        DataPoint::builder(Measurement::Schema.to_string().as_str())
            .field("matched", self.health.matched as i64)
            .field("known", self.health.known as i64)
            .timestamp(timestamp_nanos(&self.timestamp)?)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build SchemaHealthMetric: {}", e))
            })
    }
}

/// Page-level scalars that were found, in a fixed order.
pub fn status_values(snapshot: &Snapshot) -> Vec<(&'static str, MetricValue)> {
    use MetricValue::{Float, Integer, Timestamp};

    [
        (Field::Started, snapshot.started_at.map(Timestamp)),
        (Field::Uptime, snapshot.uptime_seconds.map(Integer)),
        (Field::RequestsTotal, snapshot.requests_total.map(Integer)),
        (Field::RequestsRate, snapshot.requests_rate_per_second.map(Float)),
        (
            Field::UntiledRequestsTotal,
            snapshot.untiled_requests_total.map(Integer),
        ),
        (
            Field::UntiledRequestsRate,
            snapshot.untiled_requests_rate_per_second.map(Float),
        ),
        (Field::BytesTotal, snapshot.bytes_total.map(Integer)),
        (Field::Bandwidth, snapshot.bandwidth_mbps.map(Float)),
        (Field::CacheHitRatio, snapshot.cache_hit_ratio_percent.map(Float)),
        (Field::BlankRatio, snapshot.blank_ratio_percent.map(Float)),
        (
            Field::PeakRequestRate,
            snapshot.peak_request_rate_per_second.map(Float),
        ),
        (
            Field::PeakRequestRateAt,
            snapshot.peak_request_rate_at.map(Timestamp),
        ),
        (Field::PeakBandwidth, snapshot.peak_bandwidth_mbps.map(Float)),
        (Field::PeakBandwidthAt, snapshot.peak_bandwidth_at.map(Timestamp)),
        (Field::StatsDelay, snapshot.stats_delay_seconds.map(Float)),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field.name(), v)))
    .collect()
}

/// Renders one poll into data point builders.
///
/// `gwc_up` is always first. A down poll renders nothing else.
pub fn snapshot_metrics(
    scrape: &Scrape,
    timestamp: DateTime<Local>,
) -> Vec<Box<dyn DataPointBuilder>> {
    let mut metrics: Vec<Box<dyn DataPointBuilder>> = vec![Box::new(UpMetric {
        up: scrape.is_up(),
        timestamp,
    })];
    let Some(snapshot) = scrape.snapshot() else {
        return metrics;
    };

    for (name, value) in status_values(snapshot) {
        metrics.push(Box::new(StatusMetric {
            name,
            value,
            timestamp,
        }));
    }
    for stats in snapshot.windows.iter().filter(|w| w.has_values()) {
        metrics.push(Box::new(IntervalMetric {
            stats: stats.clone(),
            timestamp,
        }));
    }
    if snapshot.storage.config_file.is_some() || snapshot.storage.local_storage.is_some() {
        metrics.push(Box::new(StorageMetric {
            storage: snapshot.storage.clone(),
            timestamp,
        }));
    }
    if let Some(build) = &snapshot.build {
        metrics.push(Box::new(BuildInfoMetric {
            build: build.clone(),
            timestamp,
        }));
    }
    metrics.push(Box::new(MemoryCacheMetric {
        stats: snapshot.memory_cache.clone(),
        timestamp,
    }));
    metrics.push(Box::new(SchemaHealthMetric {
        health: snapshot.health,
        timestamp,
    }));
    metrics
}
