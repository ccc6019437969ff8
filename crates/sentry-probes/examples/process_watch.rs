//! Demonstrates the process probe's hysteresis-based CPU/RAM alerting.
//! Run with: cargo run -p sentry-probes --example process_watch

use sentry_core::AlertBus;
use sentry_probes::sampler::run_sampler_loop;
use sentry_probes::{CancelToken, ProcessMonitorThresholds, ProcessProbe};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let probe = ProcessProbe::new(ProcessMonitorThresholds::default());
    let bus = AlertBus::new();
    let cancel = CancelToken::new();

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrl_c_cancel.stop();
    });

    let watch_bus = bus.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(2)).await;
            for alert in watch_bus.history() {
                println!("[{}] {}", alert.severity, alert.message);
            }
            watch_bus.clear();
        }
    });

    run_sampler_loop(probe, bus, Duration::from_secs(1), cancel).await;
}
