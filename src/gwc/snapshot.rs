//! Assembly of the fixed-shape [`Snapshot`] from a normalized status page.

use chrono::{DateTime, Utc};

use super::normalize::normalize;
use super::rules::{Extracted, Field, Schema, WindowStats, MEMORY_CACHE_MARKER};

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Scrape {
    /// The page could not be fetched. Nothing else is known.
    Down,
    /// The page was fetched and every field was attempted.
    Up(Snapshot),
}

impl Scrape {
    pub fn is_up(&self) -> bool {
        matches!(self, Scrape::Up(_))
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Scrape::Up(snapshot) => Some(snapshot),
            Scrape::Down => None,
        }
    }
}

/// Storage paths reported on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageInfo {
    pub config_file: Option<String>,
    pub local_storage: Option<String>,
}

/// Version and build strings. At least one of them is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub version: String,
    pub build: String,
}

/// In-memory cache statistics.
///
/// Either the block was found and `present` is true, or every value is zero. A
/// sub-field that fails to extract inside a present block is also zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCacheStats {
    pub present: bool,
    pub requests_total: u64,
    pub hit_count_total: u64,
    pub miss_count_total: u64,
    pub hit_ratio_percent: f64,
    pub miss_ratio_percent: f64,
    pub evicted_tiles_total: u64,
    pub occupation_percent: f64,
    pub actual_size_bytes: u64,
    pub total_size_bytes: u64,
}

/// How many rules produced a value for this page.
///
/// A reachable page where `matched` drops to zero usually means the upstream
/// wording changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaHealth {
    pub matched: usize,
    pub known: usize,
}

/// Everything extracted from one status page.
///
/// The shape never changes between polls; only `None` versus `Some` does.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub started_at: Option<DateTime<Utc>>,
    pub uptime_seconds: Option<u64>,
    pub requests_total: Option<u64>,
    pub requests_rate_per_second: Option<f64>,
    pub untiled_requests_total: Option<u64>,
    pub untiled_requests_rate_per_second: Option<f64>,
    pub bytes_total: Option<u64>,
    pub bandwidth_mbps: Option<f64>,
    pub cache_hit_ratio_percent: Option<f64>,
    pub blank_ratio_percent: Option<f64>,
    pub peak_request_rate_per_second: Option<f64>,
    pub peak_request_rate_at: Option<DateTime<Utc>>,
    pub peak_bandwidth_mbps: Option<f64>,
    pub peak_bandwidth_at: Option<DateTime<Utc>>,
    pub stats_delay_seconds: Option<f64>,
    pub windows: Vec<WindowStats>,
    pub storage: StorageInfo,
    pub build: Option<BuildInfo>,
    pub memory_cache: MemoryCacheStats,
    pub health: SchemaHealth,
}

impl Snapshot {
    /// Normalizes a raw status page and builds a snapshot from it.
    pub fn from_page(schema: &Schema, page: &str) -> Self {
        build(schema, &normalize(page))
    }
}

/// Builds a snapshot from already normalized text.
///
/// Never fails: a field that cannot be found or converted is left empty.
pub fn build(schema: &Schema, normalized: &str) -> Snapshot {
    let page = schema.extract(normalized);
    let windows = schema.extract_windows(normalized);
    let (memory_cache, memory_cache_matched) = build_memory_cache(schema, normalized);

    let health = SchemaHealth {
        matched: page.len()
            + windows.iter().filter(|w| w.has_values()).count()
            + memory_cache_matched,
        known: schema.known(),
    };

    Snapshot {
        started_at: page.timestamp(Field::Started),
        uptime_seconds: page.seconds(Field::Uptime),
        requests_total: page.integer(Field::RequestsTotal),
        requests_rate_per_second: page.float(Field::RequestsRate),
        untiled_requests_total: page.integer(Field::UntiledRequestsTotal),
        untiled_requests_rate_per_second: page.float(Field::UntiledRequestsRate),
        bytes_total: page.integer(Field::BytesTotal),
        bandwidth_mbps: page.float(Field::Bandwidth),
        cache_hit_ratio_percent: page.float(Field::CacheHitRatio),
        blank_ratio_percent: page.float(Field::BlankRatio),
        peak_request_rate_per_second: page.float(Field::PeakRequestRate),
        peak_request_rate_at: page.timestamp(Field::PeakRequestRateAt),
        peak_bandwidth_mbps: page.float(Field::PeakBandwidth),
        peak_bandwidth_at: page.timestamp(Field::PeakBandwidthAt),
        stats_delay_seconds: page.float(Field::StatsDelay),
        windows,
        storage: StorageInfo {
            config_file: page.text(Field::ConfigFile),
            local_storage: page.text(Field::LocalStorage),
        },
        build: build_info(&page),
        memory_cache,
        health,
    }
}

fn build_info(page: &Extracted) -> Option<BuildInfo> {
    page.text_pair(Field::VersionBuild)
        .map(|(version, build)| BuildInfo { version, build })
}

fn build_memory_cache(schema: &Schema, normalized: &str) -> (MemoryCacheStats, usize) {
    if !normalized.contains(MEMORY_CACHE_MARKER) {
        return (MemoryCacheStats::default(), 0);
    }

    let block = schema.extract_memory_cache(normalized);
    let (actual_size_bytes, total_size_bytes) = block
        .byte_pair(Field::MemoryCacheSizes)
        .unwrap_or_default();
    let stats = MemoryCacheStats {
        present: true,
        requests_total: block.integer(Field::MemoryCacheRequests).unwrap_or_default(),
        hit_count_total: block.integer(Field::MemoryCacheHits).unwrap_or_default(),
        miss_count_total: block.integer(Field::MemoryCacheMisses).unwrap_or_default(),
        hit_ratio_percent: block.float(Field::MemoryCacheHitRatio).unwrap_or_default(),
        miss_ratio_percent: block.float(Field::MemoryCacheMissRatio).unwrap_or_default(),
        evicted_tiles_total: block.integer(Field::MemoryCacheEvictions).unwrap_or_default(),
        occupation_percent: block.float(Field::MemoryCacheOccupation).unwrap_or_default(),
        actual_size_bytes,
        total_size_bytes,
    };
    (stats, block.len())
}
