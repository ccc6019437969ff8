//! Network-facing capability used by the port probe: an async TCP
//! connect-scan abstraction over `tokio`.

pub mod tcp_prober;

pub use tcp_prober::{AsyncTcpProber, PortState, TcpProber};
