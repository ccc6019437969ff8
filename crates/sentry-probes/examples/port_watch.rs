//! Demonstrates wiring a `PortProbe` into the sampler loop, printing every
//! published alert. Run with:
//!
//!     cargo run -p sentry-probes --example port_watch -- 127.0.0.1 1-1024

use sentry_core::AlertBus;
use sentry_net::AsyncTcpProber;
use sentry_probes::port_probe::{parse_port_spec, PortProbe};
use sentry_probes::{run_sampler_loop, CancelToken};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port_spec = args.next().unwrap_or_else(|| "1-1024".to_string());

    let target_addr = target.parse().expect("invalid target IP address");
    let ports = parse_port_spec(&port_spec).expect("invalid port spec");

    let prober = Arc::new(AsyncTcpProber::new(Duration::from_millis(500)));
    let probe = PortProbe::new(target_addr, ports, prober).expect("failed to start port probe");

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
            tokio::time::sleep(Duration::from_secs(1)).await;
            for alert in watch_bus.history() {
                println!("[{}] {} {}", alert.severity, alert.source, alert.message);
            }
            watch_bus.clear();
        }
    });

    run_sampler_loop(probe, bus, Duration::from_secs(5), cancel).await;
}
