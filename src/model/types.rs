use std::fmt;

/// InfluxDB measurement (table) a data point is written to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Measurement {
    /// Liveness of the status page, 1 or 0
    Up,
    /// Page-level scalars, one point per present value
    Status,
    /// Rolling window rows
    Interval,
    /// Storage paths
    Storage,
    /// Version and build
    Build,
    /// In-memory cache statistics
    MemoryCache,
    /// Extraction health for the page
    Schema,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Measurement::Up => write!(f, "gwc_up"),
            Measurement::Status => write!(f, "gwc_status"),
            Measurement::Interval => write!(f, "gwc_interval"),
            Measurement::Storage => write!(f, "gwc_storage"),
            Measurement::Build => write!(f, "gwc_build"),
            Measurement::MemoryCache => write!(f, "gwc_memcache"),
            Measurement::Schema => write!(f, "gwc_schema"),
        }
    }
}

/// Value of a single page-level scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(u64),
    Float(f64),
    /// Written as whole seconds since the epoch
    Timestamp(chrono::DateTime<chrono::Utc>),
}
