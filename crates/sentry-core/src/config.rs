//! Configuration structures for the sampler loop and each probe.
//!
//! Mirrors the teacher's composed `Config { scan, network, output, ... }`
//! shape: one sub-struct per concern, `Default` derived with
//! `#[serde(default)]` fields, TOML load/save helpers, and a `validate()`
//! that rejects out-of-range values before the sampler starts.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration for a monitoring run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub port_scan: PortScanConfig,
    #[serde(default)]
    pub process_monitor: ProcessMonitorConfig,
    #[serde(default)]
    pub fs_monitor: FsMonitorConfig,
}

impl Config {
    pub fn load_from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        self.port_scan.validate()?;
        self.process_monitor.validate()?;
        self.fs_monitor.validate()?;
        Ok(())
    }
}

fn default_interval_secs() -> u64 {
    1
}

/// Cadence and run-mode shared across every probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Config("sampler.interval_secs must be > 0".into()));
        }
        Ok(())
    }
}

fn default_target() -> String {
    "127.0.0.1".to_string()
}
fn default_port_spec() -> String {
    "1-1024".to_string()
}
fn default_connect_timeout_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortScanConfig {
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_port_spec")]
    pub port_spec: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            port_spec: default_port_spec(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl PortScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_ms == 0 {
            return Err(Error::Config("port_scan.connect_timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}

fn default_cpu_threshold() -> f32 {
    70.0
}
fn default_ram_threshold() -> f32 {
    50.0
}
fn default_min_seconds_for_alert() -> u64 {
    2
}
fn default_sample_interval() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMonitorConfig {
    #[serde(default = "default_cpu_threshold")]
    pub cpu_threshold: f32,
    #[serde(default = "default_ram_threshold")]
    pub ram_threshold: f32,
    #[serde(default = "default_min_seconds_for_alert")]
    pub min_seconds_for_alert: u64,
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u64,
}

impl Default for ProcessMonitorConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: default_cpu_threshold(),
            ram_threshold: default_ram_threshold(),
            min_seconds_for_alert: default_min_seconds_for_alert(),
            sample_interval: default_sample_interval(),
        }
    }
}

impl ProcessMonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.cpu_threshold) {
            return Err(Error::Config("process_monitor.cpu_threshold must be 0..=100".into()));
        }
        if !(0.0..=100.0).contains(&self.ram_threshold) {
            return Err(Error::Config("process_monitor.ram_threshold must be 0..=100".into()));
        }
        Ok(())
    }

    /// Parse the legacy `KEY = VALUE` config format used alongside TOML.
    ///
    /// Unknown keys are warned about and ignored; malformed lines (no `=`)
    /// are warned about and skipped, matching the original daemon's
    /// tolerant line-based parser.
    pub fn parse_legacy(s: &str) -> Self {
        let mut config = Self::default();
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line, "malformed config line, skipping");
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "cpu_threshold" => {
                    if let Ok(v) = value.parse() {
                        config.cpu_threshold = v;
                    }
                }
                "ram_threshold" => {
                    if let Ok(v) = value.parse() {
                        config.ram_threshold = v;
                    }
                }
                "min_seconds_for_alert" => {
                    if let Ok(v) = value.parse() {
                        config.min_seconds_for_alert = v;
                    }
                }
                "sample_interval" => {
                    if let Ok(v) = value.parse() {
                        config.sample_interval = v;
                    }
                }
                other => tracing::warn!(key = other, "unknown config key, ignoring"),
            }
        }
        config
    }
}

fn default_watch_paths() -> Vec<String> {
    vec!["/etc".to_string()]
}
fn default_change_threshold_percent() -> f32 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsMonitorConfig {
    #[serde(default = "default_watch_paths")]
    pub watch_paths: Vec<String>,
    #[serde(default = "default_change_threshold_percent")]
    pub change_threshold_percent: f32,
}

impl Default for FsMonitorConfig {
    fn default() -> Self {
        Self {
            watch_paths: default_watch_paths(),
            change_threshold_percent: default_change_threshold_percent(),
        }
    }
}

impl FsMonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.watch_paths.is_empty() {
            return Err(Error::Config("fs_monitor.watch_paths must not be empty".into()));
        }
        if self.change_threshold_percent < 0.0 {
            return Err(Error::Config(
                "fs_monitor.change_threshold_percent must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
