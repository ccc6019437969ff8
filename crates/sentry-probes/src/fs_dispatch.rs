//! Runs one [`FsProbe`] per watched path, grouped by underlying storage
//! device: paths on different devices scan concurrently, paths sharing a
//! device scan one at a time so a slow disk doesn't make its own paths
//! race each other.
//!
//! If a device's previous cycle is still running when the next tick fires
//! (e.g. a huge tree on a slow disk), that device's `try_lock` fails and
//! the cycle is dropped for that device rather than queued — a slow disk
//! falling behind should not make every other disk's monitoring fall
//! behind with it.

use crate::fs_probe::{FsObservation, FsProbe};
use sentry_core::probe::Probe;
use sentry_core::{Alert, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

#[cfg(unix)]
fn device_id(path: &std::path::Path) -> Result<u64> {
    use std::os::unix::fs::MetadataExt;
    Ok(std::fs::metadata(path)?.dev())
}

#[cfg(not(unix))]
fn device_id(_path: &std::path::Path) -> Result<u64> {
    // No portable device id on this platform: treat every path as its own
    // device so scans still run, just without cross-path device sharing.
    Ok(0)
}

struct DeviceGroup {
    /// Held for the duration of a device's cycle; `try_lock` fails if the
    /// previous cycle for this device hasn't finished yet.
    guard: Arc<Mutex<Vec<(FsProbe, Option<FsObservation>)>>>,
}

/// Dispatches one sample cycle across every watched path.
pub struct FsDispatcher {
    devices: HashMap<u64, DeviceGroup>,
}

impl FsDispatcher {
    pub fn new(roots: Vec<PathBuf>, change_threshold_percent: f32) -> Result<Self> {
        let mut by_device: HashMap<u64, Vec<(FsProbe, Option<FsObservation>)>> = HashMap::new();
        for root in roots {
            let device = device_id(&root)?;
            by_device
                .entry(device)
                .or_default()
                .push((FsProbe::new(root, change_threshold_percent), None));
        }
        let devices = by_device
            .into_iter()
            .map(|(device, paths)| (device, DeviceGroup { guard: Arc::new(Mutex::new(paths)) }))
            .collect();
        Ok(Self { devices })
    }

    /// Run one sample cycle. Devices scan concurrently; a device whose
    /// prior cycle is still in flight is skipped and logged.
    pub async fn run_cycle(&self) -> Vec<Alert> {
        let mut tasks = tokio::task::JoinSet::new();
        for (&device, group) in &self.devices {
            let guard = group.guard.clone();
            tasks.spawn(async move {
                let Ok(mut paths) = guard.try_lock() else {
                    warn!(device, "device still busy from previous cycle, skipping");
                    return Vec::new();
                };
                let mut alerts = Vec::new();
                for (probe, previous) in paths.iter_mut() {
                    let current = match probe.sample() {
                        Ok(observation) => observation,
                        Err(err) => {
                            warn!(%err, "fs probe sample failed");
                            continue;
                        }
                    };
                    for delta in probe.diff(previous.as_ref(), &current) {
                        alerts.push(probe.classify(&delta));
                    }
                    *previous = Some(current);
                }
                alerts
            });
        }

        let mut alerts = Vec::new();
        while let Some(result) = tasks.join_next().await {
            if let Ok(mut device_alerts) = result {
                alerts.append(&mut device_alerts);
            }
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_cycle_establishes_baseline_with_one_informational_alert() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = FsDispatcher::new(vec![dir.path().to_path_buf()], 10.0).unwrap();
        let alerts = dispatcher.run_cycle().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, sentry_core::Severity::Low);
    }

    #[tokio::test]
    async fn paths_on_different_devices_both_get_sampled() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let dispatcher = FsDispatcher::new(
            vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()],
            10.0,
        )
        .unwrap();
        // Both baseline cycles succeed without panicking or deadlocking.
        let alerts = dispatcher.run_cycle().await;
        assert_eq!(alerts.len(), 2);
    }
}
