//! Cached access to system-wide memory totals.
//!
//! [`crate::probe`] implementations that need to turn an absolute RSS figure
//! into a percentage (the process probe's `memory_usage_percent`) need the
//! machine's total memory, which barely changes and is expensive enough to
//! refresh that it is worth caching rather than querying `sysinfo` on every
//! sample.

use std::time::{Duration, Instant};
use sysinfo::System;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

pub struct SystemMemory {
    system: System,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
}

impl SystemMemory {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self {
            system,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            last_refresh: Some(Instant::now()),
        }
    }

    fn refresh_if_stale(&mut self) {
        let stale = match self.last_refresh {
            Some(t) => t.elapsed() >= self.refresh_interval,
            None => true,
        };
        if stale {
            self.system.refresh_memory();
            self.last_refresh = Some(Instant::now());
        }
    }

    /// Total system memory, in kibibytes.
    pub fn total_kb(&mut self) -> u64 {
        self.refresh_if_stale();
        self.system.total_memory()
    }

    /// Available system memory, in kibibytes.
    pub fn available_kb(&mut self) -> u64 {
        self.refresh_if_stale();
        self.system.available_memory()
    }

    /// Express `used_kb` as a percentage of total system memory. Returns
    /// `0.0` if total memory could not be determined.
    pub fn percent_of_total(&mut self, used_kb: u64) -> f32 {
        let total = self.total_kb();
        if total == 0 {
            return 0.0;
        }
        (used_kb as f64 / total as f64 * 100.0) as f32
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}
