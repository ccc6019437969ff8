//! Drives a single [`Probe`] through repeated sample/diff/classify/publish
//! cycles on a fixed interval until told to stop.
//!
//! Cancellation is cooperative via an `Arc<AtomicBool>`, not
//! `tokio_util::sync::CancellationToken`: the flag is checked once per
//! tick, so a running sample is never interrupted mid-flight, only the
//! next tick is skipped.

use sentry_core::probe::Probe;
use sentry_core::{AlertBus, Result, Severity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// A cancellation handle shared between the sampler loop and whoever wants
/// to stop it.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Upper bound on how long a single sleep tick waits before re-checking the
/// cancel flag; caps cancellation latency at one second regardless of the
/// configured sampling interval.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sleeps for `duration`, checking `cancel` at least once a second so a
/// long interval doesn't delay shutdown.
async fn sleep_cancellable(duration: Duration, cancel: &CancelToken) {
    let mut remaining = duration;
    while remaining > Duration::ZERO {
        if !cancel.is_running() {
            return;
        }
        let tick = remaining.min(CANCEL_POLL_INTERVAL);
        tokio::time::sleep(tick).await;
        remaining -= tick;
    }
}

/// Runs `probe` on a fixed cadence, publishing every classified delta onto
/// `bus`, until `cancel` is stopped or the loop is asked to exit.
///
/// Steps each cycle: sample, diff against the previous observation
/// (`None` on the first cycle), classify each delta into an alert,
/// publish, then sleep until the next tick in 1-second increments,
/// re-checking `cancel` between them. A sample error is logged and the
/// loop continues rather than aborting — one bad cycle should not end
/// monitoring.
pub async fn run_sampler_loop<P: Probe>(
    mut probe: P,
    bus: AlertBus,
    interval: Duration,
    cancel: CancelToken,
) {
    let mut previous: Option<P::Observation> = None;

    while cancel.is_running() {
        match probe.sample() {
            Ok(current) => {
                let deltas = probe.diff(previous.as_ref(), &current);
                for delta in &deltas {
                    let alert = probe.classify(delta);
                    // Low severity is informational only (e.g. a recognized
                    // service opening, or a port closing): worth logging,
                    // not worth keeping in the bus's alert history.
                    if alert.severity == Severity::Low {
                        info!(probe = probe.name(), message = %alert.message, "low severity, not published");
                    } else {
                        bus.publish(alert);
                    }
                }
                previous = Some(current);
            }
            Err(err) => {
                error!(probe = probe.name(), %err, "probe sample failed, continuing");
            }
        }

        sleep_cancellable(interval, &cancel).await;
    }

    info!(probe = probe.name(), "sampler loop stopped");
}

/// Run exactly one sample/diff/classify cycle against `probe`, returning
/// the alerts that would have been published (Low severity excluded, same
/// as [`run_sampler_loop`]), without sleeping or looping. Useful for tests
/// and one-shot invocations.
pub fn run_one_cycle<P: Probe>(
    probe: &mut P,
    previous: Option<&P::Observation>,
) -> Result<(P::Observation, Vec<sentry_core::Alert>)> {
    let current = probe.sample()?;
    let deltas = probe.diff(previous, &current);
    let alerts = deltas
        .iter()
        .map(|d| probe.classify(d))
        .filter(|alert| alert.severity != Severity::Low)
        .collect();
    Ok((current, alerts))
}
