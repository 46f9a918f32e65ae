//! GeoWebCache status page retrieval and extraction.

mod client;
mod collector;
mod convert;
mod normalize;
mod rules;
mod snapshot;

pub use client::Client;
pub use collector::GwcMetricCollector;
pub use rules::{Field, Schema, WindowStats};
#[cfg(test)]
pub use rules::Window;
pub use snapshot::{BuildInfo, MemoryCacheStats, Scrape, SchemaHealth, Snapshot, StorageInfo};
