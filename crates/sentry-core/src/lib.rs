//! Core types shared by every probe: alerts, the alert bus, the probe
//! abstraction, configuration, the service/threat catalogues, and errors.
//!
//! # Examples
//!
//! ```
//! use sentry_core::{Alert, AlertBus, Severity};
//! use chrono::Utc;
//!
//! let bus = AlertBus::new();
//! bus.publish(Alert::new(Severity::High, "port_probe", "open port", "detail", Utc::now()));
//! assert_eq!(bus.counts().high, 1);
//! ```

pub mod alert;
pub mod alert_bus;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod probe;
pub mod resource_monitor;
pub mod severity;

pub use alert::{Alert, MAX_MESSAGE_LEN, MAX_SUBJECT_LEN};
pub use alert_bus::{AlertBus, AlertCounts};
pub use config::{Config, FsMonitorConfig, PortScanConfig, ProcessMonitorConfig, SamplerConfig};
pub use error::{Error, Result};
pub use probe::Probe;
pub use resource_monitor::SystemMemory;
pub use severity::Severity;
