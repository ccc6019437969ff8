//! Watches every running process for sustained CPU or memory usage above a
//! configured threshold.
//!
//! A single instant above a threshold is noise — a process legitimately
//! spikes to 100% CPU for a fraction of a second all the time. The probe
//! only alerts once a process has stayed above the threshold for at least
//! `min_seconds_for_alert`, and keeps alerting once per cycle for as long
//! as the condition persists (hysteresis, not an edge trigger). The
//! exceed-start timestamps live in a `Mutex` inside the probe rather than
//! in the sampled [`ProcessObservation`] itself, since they accumulate
//! across many cycles, not just the two being diffed.

use chrono::Utc;
use parking_lot::Mutex;
use sentry_core::{probe::Probe, resource_monitor::SystemMemory, Alert, Result, Severity};
use std::collections::HashMap;
use std::time::Instant;
use sysinfo::{Pid, System};

#[derive(Debug, Clone, Copy)]
pub struct ProcessMonitorThresholds {
    pub cpu_threshold: f32,
    pub ram_threshold: f32,
    pub min_seconds_for_alert: u64,
}

impl Default for ProcessMonitorThresholds {
    fn default() -> Self {
        Self {
            cpu_threshold: 70.0,
            ram_threshold: 50.0,
            min_seconds_for_alert: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub name: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessObservation {
    pub samples: HashMap<u32, ProcessSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceedKind {
    Cpu,
    Ram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDelta {
    pub pid: u32,
    pub name: String,
    pub kind: ExceedKind,
    pub value: f32,
}

#[derive(Default)]
struct ExceedState {
    first_exceed_cpu: Option<Instant>,
    first_exceed_ram: Option<Instant>,
    seen_this_cycle: bool,
}

pub struct ProcessProbe {
    system: System,
    memory: SystemMemory,
    thresholds: ProcessMonitorThresholds,
    history: Mutex<HashMap<u32, ExceedState>>,
}

impl ProcessProbe {
    pub fn new(thresholds: ProcessMonitorThresholds) -> Self {
        Self {
            system: System::new_all(),
            memory: SystemMemory::new(),
            thresholds,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Pids whose condition has just become sustained (or remains sustained)
    /// this cycle, recorded as a side effect of reading `current`.
    fn sustained_exceedances(&self, current: &ProcessObservation) -> Vec<ProcessDelta> {
        let now = Instant::now();
        let mut history = self.history.lock();
        let mut deltas = Vec::new();

        for entry in history.values_mut() {
            entry.seen_this_cycle = false;
        }

        for (&pid, sample) in &current.samples {
            let entry = history.entry(pid).or_default();
            entry.seen_this_cycle = true;

            if sample.cpu_percent > self.thresholds.cpu_threshold {
                let start = *entry.first_exceed_cpu.get_or_insert(now);
                if now.duration_since(start).as_secs() >= self.thresholds.min_seconds_for_alert {
                    deltas.push(ProcessDelta {
                        pid,
                        name: sample.name.clone(),
                        kind: ExceedKind::Cpu,
                        value: sample.cpu_percent,
                    });
                }
            } else {
                entry.first_exceed_cpu = None;
            }

            if sample.mem_percent > self.thresholds.ram_threshold {
                let start = *entry.first_exceed_ram.get_or_insert(now);
                if now.duration_since(start).as_secs() >= self.thresholds.min_seconds_for_alert {
                    deltas.push(ProcessDelta {
                        pid,
                        name: sample.name.clone(),
                        kind: ExceedKind::Ram,
                        value: sample.mem_percent,
                    });
                }
            } else {
                entry.first_exceed_ram = None;
            }
        }

        history.retain(|_, entry| entry.seen_this_cycle);
        deltas
    }
}

impl Probe for ProcessProbe {
    type Observation = ProcessObservation;
    type Delta = ProcessDelta;

    fn name(&self) -> &'static str {
        "process_probe"
    }

    fn sample(&mut self) -> Result<Self::Observation> {
        self.system.refresh_processes();
        let mut samples = HashMap::new();
        for (pid, process) in self.system.processes() {
            let mem_percent = self.memory.percent_of_total(process.memory());
            samples.insert(
                pid_to_u32(*pid),
                ProcessSample {
                    name: process.name().to_string(),
                    cpu_percent: process.cpu_usage(),
                    mem_percent,
                },
            );
        }
        Ok(ProcessObservation { samples })
    }

    /// `previous` is ignored: the hysteresis state that decides whether a
    /// delta fires lives in `self.history`, already updated as a side
    /// effect of computing the result, and spans more than the two
    /// observations being compared here.
    fn diff(&self, _previous: Option<&Self::Observation>, current: &Self::Observation) -> Vec<Self::Delta> {
        self.sustained_exceedances(current)
    }

    fn classify(&self, delta: &Self::Delta) -> Alert {
        let (severity, label) = match delta.kind {
            ExceedKind::Cpu => (Severity::High, "CPU"),
            ExceedKind::Ram => (Severity::High, "RAM"),
        };
        Alert::new(
            severity,
            self.name(),
            format!("{} uso elevado de {label}", delta.name),
            format!(
                "Proceso {} (pid {}) supera el umbral de {label}: {:.1}%",
                delta.name, delta.pid, delta.value
            ),
            Utc::now(),
        )
    }
}

fn pid_to_u32(pid: Pid) -> u32 {
    pid.as_u32()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cpu: f32, mem: f32) -> ProcessObservation {
        let mut samples = HashMap::new();
        samples.insert(
            1234,
            ProcessSample {
                name: "stress".into(),
                cpu_percent: cpu,
                mem_percent: mem,
            },
        );
        ProcessObservation { samples }
    }

    #[test]
    fn single_cycle_above_threshold_does_not_alert() {
        let probe = ProcessProbe::new(ProcessMonitorThresholds {
            cpu_threshold: 70.0,
            ram_threshold: 50.0,
            min_seconds_for_alert: 2,
        });
        let deltas = probe.diff(None, &sample(90.0, 10.0));
        assert!(deltas.is_empty());
    }

    #[test]
    fn sustained_exceedance_past_min_seconds_alerts() {
        let probe = ProcessProbe::new(ProcessMonitorThresholds {
            cpu_threshold: 70.0,
            ram_threshold: 50.0,
            min_seconds_for_alert: 0,
        });
        // min_seconds_for_alert = 0 means the very first exceeding sample
        // already satisfies "sustained for >= 0 seconds".
        let deltas = probe.diff(None, &sample(90.0, 10.0));
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].kind, ExceedKind::Cpu);
    }

    #[test]
    fn dropping_below_threshold_resets_the_timer() {
        let probe = ProcessProbe::new(ProcessMonitorThresholds {
            cpu_threshold: 70.0,
            ram_threshold: 50.0,
            min_seconds_for_alert: 0,
        });
        probe.diff(None, &sample(90.0, 10.0));
        probe.diff(None, &sample(10.0, 10.0));
        let history = probe.history.lock();
        assert!(history.get(&1234).unwrap().first_exceed_cpu.is_none());
    }

    #[test]
    fn stale_pid_is_purged_after_disappearing() {
        let probe = ProcessProbe::new(ProcessMonitorThresholds::default());
        probe.diff(None, &sample(10.0, 10.0));
        assert!(probe.history.lock().contains_key(&1234));
        probe.diff(None, &ProcessObservation::default());
        assert!(!probe.history.lock().contains_key(&1234));
    }

    #[test]
    fn classify_produces_high_severity() {
        let probe = ProcessProbe::new(ProcessMonitorThresholds::default());
        let delta = ProcessDelta {
            pid: 1,
            name: "x".into(),
            kind: ExceedKind::Cpu,
            value: 95.0,
        };
        assert_eq!(probe.classify(&delta).severity, Severity::High);
    }
}
