//! The sampler loop and the three concrete probes: port, process, and
//! filesystem.

pub mod fs_dispatch;
pub mod fs_probe;
pub mod port_probe;
pub mod process_probe;
pub mod sampler;

pub use fs_dispatch::FsDispatcher;
pub use fs_probe::FsProbe;
pub use port_probe::PortProbe;
pub use process_probe::{ProcessMonitorThresholds, ProcessProbe};
pub use sampler::{run_one_cycle, run_sampler_loop, CancelToken};
