//! The declarative extraction table for the GeoWebCache status page.
//!
//! Each [`FieldRule`] pairs a field with one or more patterns over the normalized
//! page, the capture group holding the value, and the kind of value to convert it
//! to. The table is compiled once into a [`Schema`] and only read afterwards, so a
//! single instance can serve any number of concurrent polls.

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;

use super::convert::{
    megabytes_to_bytes, parse_duration_seconds, parse_float, parse_integer, parse_text,
    parse_timestamp,
};

/// Substring whose presence switches on the in-memory cache block.
pub const MEMORY_CACHE_MARKER: &str = "In Memory Cache Statistics";

/// Every field the extraction table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Started,
    Uptime,
    RequestsTotal,
    RequestsRate,
    UntiledRequestsTotal,
    UntiledRequestsRate,
    BytesTotal,
    Bandwidth,
    CacheHitRatio,
    BlankRatio,
    PeakRequestRate,
    PeakRequestRateAt,
    PeakBandwidth,
    PeakBandwidthAt,
    StatsDelay,
    ConfigFile,
    LocalStorage,
    VersionBuild,
    MemoryCacheRequests,
    MemoryCacheHits,
    MemoryCacheMisses,
    MemoryCacheHitRatio,
    MemoryCacheMissRatio,
    MemoryCacheEvictions,
    MemoryCacheOccupation,
    MemoryCacheSizes,
}

impl Field {
    /// Stable snake_case name used when the field is rendered.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Started => "started_seconds",
            Field::Uptime => "uptime_seconds",
            Field::RequestsTotal => "requests_total",
            Field::RequestsRate => "requests_rate_per_second",
            Field::UntiledRequestsTotal => "untiled_wms_requests_total",
            Field::UntiledRequestsRate => "untiled_wms_requests_rate_per_second",
            Field::BytesTotal => "bytes_total",
            Field::Bandwidth => "bandwidth_mbps",
            Field::CacheHitRatio => "cache_hit_ratio_percent",
            Field::BlankRatio => "blank_kml_html_ratio_percent",
            Field::PeakRequestRate => "peak_request_rate_per_second",
            Field::PeakRequestRateAt => "peak_request_rate_timestamp_seconds",
            Field::PeakBandwidth => "peak_bandwidth_mbps",
            Field::PeakBandwidthAt => "peak_bandwidth_timestamp_seconds",
            Field::StatsDelay => "stats_delay_seconds",
            Field::ConfigFile => "config_file",
            Field::LocalStorage => "local_storage",
            Field::VersionBuild => "build_info",
            Field::MemoryCacheRequests => "requests_total",
            Field::MemoryCacheHits => "hit_count_total",
            Field::MemoryCacheMisses => "miss_count_total",
            Field::MemoryCacheHitRatio => "hit_ratio_percent",
            Field::MemoryCacheMissRatio => "miss_ratio_percent",
            Field::MemoryCacheEvictions => "evicted_tiles_total",
            Field::MemoryCacheOccupation => "occupation_percent",
            Field::MemoryCacheSizes => "size_bytes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a captured substring is converted.
///
/// The pair kinds read two consecutive capture groups starting at the rule's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Duration,
    Timestamp,
    Text,
    TextPair,
    MegabytePair,
}

/// A converted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(u64),
    Float(f64),
    Seconds(u64),
    Timestamp(DateTime<Utc>),
    Text(String),
    TextPair(String, String),
    BytePair(u64, u64),
}

impl ValueKind {
    fn convert(self, caps: &Captures, group: usize) -> Option<Value> {
        let text = |index: usize| caps.get(index).map(|m| m.as_str());
        match self {
            ValueKind::Integer => parse_integer(text(group)?).map(Value::Integer),
            ValueKind::Float => parse_float(text(group)?).map(Value::Float),
            ValueKind::Duration => parse_duration_seconds(text(group)?).map(Value::Seconds),
            ValueKind::Timestamp => parse_timestamp(text(group)?).map(Value::Timestamp),
            ValueKind::Text => parse_text(text(group)?).map(Value::Text),
            ValueKind::TextPair => {
                let first = text(group).map(str::trim).unwrap_or_default();
                let second = text(group + 1).map(str::trim).unwrap_or_default();
                if first.is_empty() && second.is_empty() {
                    return None;
                }
                Some(Value::TextPair(first.to_string(), second.to_string()))
            }
            ValueKind::MegabytePair => {
                let first = megabytes_to_bytes(parse_float(text(group)?)?)?;
                let second = megabytes_to_bytes(parse_float(text(group + 1)?)?)?;
                Some(Value::BytePair(first, second))
            }
        }
    }
}

/// One named, immutable extraction recipe.
#[derive(Debug)]
pub struct FieldRule {
    field: Field,
    patterns: Vec<Regex>,
    group: usize,
    kind: ValueKind,
}

impl FieldRule {
    fn new(field: Field, kind: ValueKind, patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            field,
            patterns,
            group: 1,
            kind,
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Tries each pattern in order and returns the first one that both matches
    /// and converts.
    pub fn extract(&self, text: &str) -> Option<Value> {
        self.patterns.iter().find_map(|re| {
            let caps = re.captures(text)?;
            self.kind.convert(&caps, self.group)
        })
    }
}

/// The fixed set of rolling windows reported by the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Window {
    ThreeSeconds,
    FifteenSeconds,
    SixtySeconds,
}

impl Window {
    pub const ALL: [Window; 3] = [
        Window::ThreeSeconds,
        Window::FifteenSeconds,
        Window::SixtySeconds,
    ];

    /// Row label as printed on the page.
    pub fn label(&self) -> &'static str {
        match self {
            Window::ThreeSeconds => "3 seconds",
            Window::FifteenSeconds => "15 seconds",
            Window::SixtySeconds => "60 seconds",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sub-values of one window row. A row that is missing leaves everything `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    pub window: Window,
    pub requests: Option<u64>,
    pub rate_per_second: Option<f64>,
    pub bytes: Option<u64>,
    pub bandwidth_mbps: Option<f64>,
}

impl WindowStats {
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            requests: None,
            rate_per_second: None,
            bytes: None,
            bandwidth_mbps: None,
        }
    }

    pub fn has_values(&self) -> bool {
        self.requests.is_some()
            || self.rate_per_second.is_some()
            || self.bytes.is_some()
            || self.bandwidth_mbps.is_some()
    }
}

/// Captures all four cells of one window row in a single match.
#[derive(Debug)]
pub struct WindowRule {
    window: Window,
    pattern: Regex,
}

impl WindowRule {
    fn new(window: Window) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"<tr>\s*<td>\s*{}\s*</td>\s*<td[^>]*>\s*([0-9,]+)\s*</td>\s*<td[^>]*>\s*([0-9.]+)\s*/s\s*</td>\s*<td[^>]*>\s*([0-9,]+)\s*</td>\s*<td[^>]*>\s*([0-9.]+)\s*mbps",
            regex::escape(window.label())
        ))?;
        Ok(Self { window, pattern })
    }

    pub fn extract(&self, text: &str) -> WindowStats {
        let Some(caps) = self.pattern.captures(text) else {
            return WindowStats::empty(self.window);
        };
        let cell = |index: usize| caps.get(index).map(|m| m.as_str());
        WindowStats {
            window: self.window,
            requests: cell(1).and_then(parse_integer),
            rate_per_second: cell(2).and_then(parse_float),
            bytes: cell(3).and_then(parse_integer),
            bandwidth_mbps: cell(4).and_then(parse_float),
        }
    }
}

/// Values pulled from one document, keyed by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted(BTreeMap<Field, Value>);

impl Extracted {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn integer(&self, field: Field) -> Option<u64> {
        match self.0.get(&field) {
            Some(Value::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, field: Field) -> Option<f64> {
        match self.0.get(&field) {
            Some(Value::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn seconds(&self, field: Field) -> Option<u64> {
        match self.0.get(&field) {
            Some(Value::Seconds(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn timestamp(&self, field: Field) -> Option<DateTime<Utc>> {
        match self.0.get(&field) {
            Some(Value::Timestamp(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, field: Field) -> Option<String> {
        match self.0.get(&field) {
            Some(Value::Text(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn text_pair(&self, field: Field) -> Option<(String, String)> {
        match self.0.get(&field) {
            Some(Value::TextPair(a, b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    }

    pub fn byte_pair(&self, field: Field) -> Option<(u64, u64)> {
        match self.0.get(&field) {
            Some(Value::BytePair(a, b)) => Some((*a, *b)),
            _ => None,
        }
    }
}

// Label followed by the value in the next table cell.
const CELL: &str = r"\s*</th>\s*<td[^>]*>\s*";
// Same, for the memory cache table which uses <td> for labels.
const TD_CELL: &str = r"\s*</td>\s*<td[^>]*>\s*";
const RFC1123: &str =
    r"([A-Za-z]{3}, [0-9]{1,2} [A-Za-z]{3} [0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2} GMT)";

/// The compiled extraction table.
#[derive(Debug)]
pub struct Schema {
    rules: Vec<FieldRule>,
    memory_cache_rules: Vec<FieldRule>,
    windows: Vec<WindowRule>,
}

impl Schema {
    pub fn new() -> Result<Self, regex::Error> {
        use Field::*;
        use ValueKind::*;

        let rules = vec![
            FieldRule::new(
                VersionBuild,
                TextPair,
                &[r"Welcome to GeoWebCache version ([^,]+), build ([^<]+)"],
            )?,
            FieldRule::new(
                Started,
                Timestamp,
                &[
                    &format!("Started:{CELL}{RFC1123}"),
                    &format!(r"Started:\s*{RFC1123}"),
                ],
            )?,
            FieldRule::new(
                Uptime,
                Duration,
                &[r"Started:.*?\(\s*([0-9.]+\s*[A-Za-z]+)\s*\)"],
            )?,
            FieldRule::new(
                RequestsTotal,
                Integer,
                &[
                    &format!(r"Total number of requests:{CELL}([0-9,]+)"),
                    r"Total number of requests:\s*([0-9,]+)",
                ],
            )?,
            FieldRule::new(
                RequestsRate,
                Float,
                &[
                    &format!(r"Total number of requests:{CELL}[0-9,]+\s*\(\s*([0-9.]+)\s*/s\s*\)"),
                    r"Total number of requests:\s*[0-9,]+\s*\(\s*([0-9.]+)\s*/s\s*\)",
                ],
            )?,
            FieldRule::new(
                UntiledRequestsTotal,
                Integer,
                &[
                    &format!(r"Total number of untiled WMS requests:{CELL}([0-9,]+)"),
                    r"Total number of untiled WMS requests:\s*([0-9,]+)",
                ],
            )?,
            FieldRule::new(
                UntiledRequestsRate,
                Float,
                &[
                    &format!(r"Total number of untiled WMS requests:{CELL}[0-9,]+\s*\(\s*([0-9.]+)\s*/s\s*\)"),
                    r"Total number of untiled WMS requests:\s*[0-9,]+\s*\(\s*([0-9.]+)\s*/s\s*\)",
                ],
            )?,
            FieldRule::new(
                BytesTotal,
                Integer,
                &[
                    &format!(r"Total number of bytes:{CELL}([0-9,]+)"),
                    r"Total number of bytes:\s*([0-9,]+)",
                ],
            )?,
            FieldRule::new(
                Bandwidth,
                Float,
                &[
                    &format!(r"Total number of bytes:{CELL}[0-9,]+\s*\(\s*([0-9.]+)\s*mbps"),
                    r"Total number of bytes:\s*[0-9,]+\s*\(\s*([0-9.]+)\s*mbps",
                ],
            )?,
            FieldRule::new(
                CacheHitRatio,
                Float,
                &[&format!(r"Cache hit ratio:{CELL}([0-9.]+)\s*% of requests")],
            )?,
            FieldRule::new(
                BlankRatio,
                Float,
                &[&format!(r"Blank/KML/HTML:{CELL}([0-9.]+)\s*% of requests")],
            )?,
            FieldRule::new(
                PeakRequestRate,
                Float,
                &[&format!(r"Peak request rate:{CELL}([0-9.]+)\s*/s")],
            )?,
            FieldRule::new(
                PeakRequestRateAt,
                Timestamp,
                &[&format!(
                    r"Peak request rate:{CELL}[0-9.]+\s*/s\s*\(([^)]+)\)"
                )],
            )?,
            FieldRule::new(
                PeakBandwidth,
                Float,
                &[&format!(r"Peak bandwidth:{CELL}([0-9.]+)\s*mbps")],
            )?,
            FieldRule::new(
                PeakBandwidthAt,
                Timestamp,
                &[&format!(
                    r"Peak bandwidth:{CELL}[0-9.]+\s*mbps\s*\(([^)]+)\)"
                )],
            )?,
            FieldRule::new(
                StatsDelay,
                Float,
                &[r"All figures are ([0-9.]+)\s*second\(s\) delayed"],
            )?,
            FieldRule::new(
                ConfigFile,
                Text,
                &[&format!(r"Config file:{CELL}<tt>([^<]+)")],
            )?,
            FieldRule::new(
                LocalStorage,
                Text,
                &[&format!(r"Local Storage:{CELL}<tt>([^<]+)")],
            )?,
        ];

        let memory_cache_rules = vec![
            FieldRule::new(
                MemoryCacheRequests,
                Integer,
                &[&format!(r"Total number of requests:{TD_CELL}([0-9,]+)")],
            )?,
            FieldRule::new(
                MemoryCacheHits,
                Integer,
                &[&format!(r"Internal Cache hit count:{TD_CELL}([0-9,]+)")],
            )?,
            FieldRule::new(
                MemoryCacheMisses,
                Integer,
                &[&format!(r"Internal Cache miss count:{TD_CELL}([0-9,]+)")],
            )?,
            FieldRule::new(
                MemoryCacheHitRatio,
                Float,
                &[&format!(r"Internal Cache hit ratio:{TD_CELL}([0-9.]+)\s*%")],
            )?,
            FieldRule::new(
                MemoryCacheMissRatio,
                Float,
                &[&format!(r"Internal Cache miss ratio:{TD_CELL}([0-9.]+)\s*%")],
            )?,
            FieldRule::new(
                MemoryCacheEvictions,
                Integer,
                &[&format!(r"Total number of evicted tiles:{TD_CELL}([0-9,]+)")],
            )?,
            FieldRule::new(
                MemoryCacheOccupation,
                Float,
                &[&format!(r"Cache Memory occupation:{TD_CELL}([0-9.]+)\s*%")],
            )?,
            FieldRule::new(
                MemoryCacheSizes,
                MegabytePair,
                &[
                    r"Cache Actual Size/ Total Size :\s*([0-9.]+)\s*/\s*([0-9.]+)\s*Mb",
                    &format!(
                        r"Cache Actual Size/ Total Size :{TD_CELL}([0-9.]+)\s*/\s*([0-9.]+)\s*Mb"
                    ),
                ],
            )?,
        ];

        let windows = Window::ALL
            .into_iter()
            .map(WindowRule::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            memory_cache_rules,
            windows,
        })
    }

    /// Total number of rules, window rows included.
    pub fn known(&self) -> usize {
        self.rules.len() + self.memory_cache_rules.len() + self.windows.len()
    }

    /// Runs the page-level rules. Every rule is evaluated independently.
    pub fn extract(&self, text: &str) -> Extracted {
        Self::apply(&self.rules, text)
    }

    /// Runs the in-memory cache rules.
    pub fn extract_memory_cache(&self, text: &str) -> Extracted {
        Self::apply(&self.memory_cache_rules, text)
    }

    /// Extracts every known window, in the fixed window order.
    pub fn extract_windows(&self, text: &str) -> Vec<WindowStats> {
        self.windows.iter().map(|rule| rule.extract(text)).collect()
    }

    fn apply(rules: &[FieldRule], text: &str) -> Extracted {
        Extracted(
            rules
                .iter()
                .filter_map(|rule| rule.extract(text).map(|value| (rule.field(), value)))
                .collect(),
        )
    }
}
