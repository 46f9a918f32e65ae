//! GeoWebCache to InfluxDB2 Forwarder
//!
//! Polls the GeoWebCache status page, extracts its runtime statistics into a
//! fixed-shape snapshot and forwards the result to InfluxDB2.
//!
//! # Architecture
//!
//! One supervised collection loop runs every `COLLECTOR_INTERVAL_SEC`. Each cycle
//! fetches the page once, builds a snapshot with the shared extraction schema and
//! writes one batch of points.
//!
//! # Features
//!
//! - Automatic respawn on task failure
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Timeout protection for hung cycles

mod config;
mod error;
mod gwc;
mod influxdb;
mod model;

#[cfg(test)]
mod test_utils;

use crate::error::CollectorError;
use crate::model::{batch_collect_metrics, MetricCollector};
use chrono::Local;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinError;
use tokio::time;
use tokio::time::{sleep, Duration};

const TASK_NAME: &str = "gwc_collectors";

#[tokio::main]
async fn main() {
    let app_config = config::load_app_config().expect("Failed to load AppConfig");
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let collector_config =
        Arc::new(config::load_collector_config().expect("Failed to load CollectorConfig"));
    let influx_config = config::load_influx_config().expect("Failed to load InfluxConfig");
    let influx_client = Arc::new(influxdb::Client::new(influx_config));

    let gwc_config = config::load_gwc_config().expect("Failed to load GwcConfig");
    let gwc_client = Arc::new(gwc::Client::new(gwc_config));
    let schema = Arc::new(gwc::Schema::new().expect("Failed to compile extraction rules"));
    tracing::info!(
        target_url = %gwc_client.target_url(),
        known = schema.known(),
        "Scraping GeoWebCache status page"
    );

    let collectors: Arc<Vec<Box<dyn MetricCollector>>> =
        Arc::new(vec![Box::new(gwc::GwcMetricCollector::new(
            Arc::clone(&gwc_client),
            Arc::clone(&schema),
        ))]);

    // Recreates the collection task after it ends or panics
    let create_collect_task_handle = || -> tokio::task::JoinHandle<()> {
        let config = Arc::clone(&collector_config);
        tokio::spawn(create_collect_task(
            Arc::clone(&influx_client),
            Arc::clone(&collectors),
            Duration::from_secs(config.interval_sec),
            TASK_NAME,
            config.task_timeout_seconds,
        ))
    };
    let mut collect_task = create_collect_task_handle();

    let mut sig_term = signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    tracing::info!("Running... Press Ctrl-C or send SIGTERM to terminate.");
    loop {
        tokio::select! {
            _ = sig_term.recv() => {
                tracing::info!("Received SIGTERM. Exiting...");
                break;
            }
            _ = ctrl_c() => {
                tracing::info!("Received SIGINT. Exiting...");
                break;
            }
            result = &mut collect_task => {
                handle_task_result(TASK_NAME, result);
                collect_task = create_collect_task_handle();
            }
        }
    }
}

/// Runs `future` to completion or until `timeout_seconds` elapse.
///
/// A timeout is logged and swallowed so the loop keeps its cadence.
async fn with_timeout<F>(
    task_name: &'static str,
    future: F,
    timeout_seconds: u64,
) -> Result<(), CollectorError>
where
    F: IntoFuture,
{
    let timeout_duration = Duration::from_secs(timeout_seconds);

    match time::timeout(timeout_duration, future).await {
        Ok(_) => Ok(()),
        Err(_) => {
            let err = CollectorError::timeout(task_name, timeout_seconds);
            tracing::error!("{}", err);
            Err(err)
        }
    }
}

/// Executes a single collection cycle and then sleeps for `interval`.
///
/// Collection errors from individual collectors and InfluxDB write errors are
/// logged but never crash the task.
async fn create_collect_task(
    influx_client: Arc<influxdb::Client>,
    collectors: Arc<Vec<Box<dyn MetricCollector>>>,
    interval: Duration,
    task_name: &'static str,
    timeout_seconds: u64,
) {
    let _ = with_timeout(
        task_name,
        async {
            let points = batch_collect_metrics(&collectors, Local::now()).await;

            for point in &points {
                tracing::debug!("{:?}", point);
            }

            match influx_client.write(points).await {
                Ok(_) => tracing::info!("Successfully wrote points to InfluxDB ({})", task_name),
                Err(e) => tracing::error!(
                    "Failed to write points to InfluxDB ({}): {:?}",
                    task_name,
                    e
                ),
            }
        },
        timeout_seconds,
    )
    .await;
    sleep(interval).await;
}

/// Logs how a supervised task ended. Panics and cancellations are errors.
fn handle_task_result(task_name: &str, result: Result<(), JoinError>) {
    match result {
        Ok(_) => {
            tracing::debug!("Task {} completed.", task_name);
        }
        Err(e) => {
            tracing::error!("Task {} failed: {:?}", task_name, e);
        }
    }
}
