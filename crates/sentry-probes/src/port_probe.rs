//! Scans a fixed set of TCP ports on a target host, classifies every
//! currently open port against the service/threat catalogue, and separately
//! reports ports that opened or closed since the last sample.
//!
//! Classification runs against the *current* open set every cycle, not just
//! newly-opened ports — a suspicious port left open across many cycles must
//! keep being reported, not just on the cycle it first appeared.

use chrono::Utc;
use sentry_core::{catalogue, probe::Probe, Alert, Error, Result, Severity};
use sentry_net::{PortState, TcpProber};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortObservation {
    /// Ports found open, ascending.
    pub open_ports: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDelta {
    /// A port open in the current sample; emitted for every open port every
    /// cycle and classified against the catalogues.
    Open(u16),
    /// A port open now that was not open in the previous sample.
    Opened(u16),
    /// A port open in the previous sample that is not open now.
    Closed(u16),
}

/// Parse a port specification such as `"22,80,1000-1010"` into a sorted,
/// deduplicated list of ports in `[1, 65535]`. Malformed tokens (including
/// ranges with a zero or inverted bound) are skipped with a warning rather
/// than failing the whole spec; an empty result after parsing is an error.
pub fn parse_port_spec(spec: &str) -> Result<Vec<u16>> {
    let mut ports = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((lo, hi)) = part.split_once('-') {
            match (lo.trim().parse::<u16>(), hi.trim().parse::<u16>()) {
                (Ok(lo), Ok(hi)) if lo >= 1 && lo <= hi => ports.extend(lo..=hi),
                _ => warn!(token = part, "skipping malformed port range"),
            }
        } else {
            match part.parse::<u16>() {
                Ok(port) if port >= 1 => ports.push(port),
                _ => warn!(token = part, "skipping malformed port"),
            }
        }
    }
    ports.sort_unstable();
    ports.dedup();
    if ports.is_empty() {
        return Err(Error::Config(format!("no valid ports in spec: {spec}")));
    }
    Ok(ports)
}

pub struct PortProbe {
    target: std::net::IpAddr,
    ports: Vec<u16>,
    prober: Arc<dyn TcpProber>,
    // Probe::sample is synchronous, but scanning is inherently async I/O;
    // a dedicated current-thread runtime bridges the two without requiring
    // every caller of the sampler loop to itself be async.
    runtime: tokio::runtime::Runtime,
}

impl PortProbe {
    pub fn new(target: std::net::IpAddr, ports: Vec<u16>, prober: Arc<dyn TcpProber>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;
        Ok(Self { target, ports, prober, runtime })
    }

    /// Maximum number of in-flight connect attempts.
    const MAX_CONCURRENCY: usize = 64;

    async fn scan(&self) -> Vec<u16> {
        let semaphore = Arc::new(tokio::sync::Semaphore::new(Self::MAX_CONCURRENCY));
        let mut tasks = tokio::task::JoinSet::new();
        for &port in &self.ports {
            let permit = semaphore.clone().acquire_owned().await.expect("semaphore not closed");
            let prober = self.prober.clone();
            let target = self.target;
            tasks.spawn(async move {
                let _permit = permit;
                (port, prober.probe(target, port).await)
            });
        }

        let mut open = Vec::new();
        while let Some(result) = tasks.join_next().await {
            if let Ok((port, PortState::Open)) = result {
                open.push(port);
            }
        }
        open.sort_unstable();
        open
    }
}

impl Probe for PortProbe {
    type Observation = PortObservation;
    type Delta = PortDelta;

    fn name(&self) -> &'static str {
        "port_probe"
    }

    fn sample(&mut self) -> Result<Self::Observation> {
        let open_ports = self.runtime.block_on(self.scan());
        Ok(PortObservation { open_ports })
    }

    fn diff(&self, previous: Option<&Self::Observation>, current: &Self::Observation) -> Vec<Self::Delta> {
        let mut deltas: Vec<PortDelta> = current.open_ports.iter().copied().map(PortDelta::Open).collect();

        if let Some(previous) = previous {
            for &port in &current.open_ports {
                if !previous.open_ports.contains(&port) {
                    deltas.push(PortDelta::Opened(port));
                }
            }
            for &port in &previous.open_ports {
                if !current.open_ports.contains(&port) {
                    deltas.push(PortDelta::Closed(port));
                }
            }
        }

        deltas
    }

    fn classify(&self, delta: &Self::Delta) -> Alert {
        match delta {
            PortDelta::Open(port) => {
                if let Some(threat) = catalogue::threat_for_port(*port) {
                    Alert::new(
                        Severity::High,
                        self.name(),
                        format!("Puerto {port} sospechoso"),
                        format!("[ALERTA] Puerto {port}/tcp abierto ({threat})"),
                        Utc::now(),
                    )
                } else if let Some(service) = catalogue::service_for_port(*port) {
                    Alert::new(
                        Severity::Low,
                        self.name(),
                        format!("Puerto {port} abierto"),
                        format!("[OK] Puerto {port}/tcp ({service}) abierto"),
                        Utc::now(),
                    )
                } else {
                    Alert::new(
                        Severity::Medium,
                        self.name(),
                        format!("Puerto {port} desconocido"),
                        format!("[ADVERTENCIA] Puerto {port}/tcp (Desconocido) abierto"),
                        Utc::now(),
                    )
                }
            }
            PortDelta::Opened(port) => Alert::new(
                Severity::Low,
                self.name(),
                format!("Puerto {port} recién abierto"),
                format!("[INFO] Puerto {port}/tcp pasó a abierto"),
                Utc::now(),
            ),
            PortDelta::Closed(port) => Alert::new(
                Severity::Low,
                self.name(),
                format!("Puerto {port} cerrado"),
                format!("[INFO] Puerto {port}/tcp cerrado"),
                Utc::now(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_port_spec_expands_ranges_and_sorts() {
        let ports = parse_port_spec("22,80,1000-1002").unwrap();
        assert_eq!(ports, vec![22, 80, 1000, 1001, 1002]);
    }

    #[test]
    fn parse_port_spec_dedupes() {
        let ports = parse_port_spec("22,22,80").unwrap();
        assert_eq!(ports, vec![22, 80]);
    }

    #[test]
    fn parse_port_spec_scenario_example() {
        assert_eq!(parse_port_spec("22,80,1-3,80").unwrap(), vec![1, 2, 3, 22, 80]);
    }

    #[test]
    fn parse_port_spec_skips_inverted_range_rather_than_failing() {
        // "100-50" is the only token and gets skipped, so the overall result
        // is empty and *that* is the error, not the malformed token itself.
        assert!(parse_port_spec("100-50").is_err());
        assert_eq!(parse_port_spec("100-50,22").unwrap(), vec![22]);
    }

    #[test]
    fn parse_port_spec_skips_garbage_rather_than_failing() {
        assert!(parse_port_spec("not-a-port").is_err());
        assert_eq!(parse_port_spec("not-a-port,443").unwrap(), vec![443]);
    }

    #[test]
    fn parse_port_spec_rejects_port_zero() {
        assert_eq!(parse_port_spec("0,22").unwrap(), vec![22]);
        assert_eq!(parse_port_spec("0-5,22").unwrap(), vec![22]);
    }

    #[test]
    fn parse_port_spec_empty_result_is_an_error() {
        assert!(parse_port_spec("").is_err());
        assert!(parse_port_spec(" , ,").is_err());
    }

    fn probe_for_classify() -> PortProbe {
        struct NeverOpen;
        #[async_trait::async_trait]
        impl TcpProber for NeverOpen {
            async fn probe(&self, _addr: std::net::IpAddr, _port: u16) -> PortState {
                PortState::Closed
            }
        }
        PortProbe::new(
            "127.0.0.1".parse().unwrap(),
            vec![],
            Arc::new(NeverOpen),
        )
        .unwrap()
    }

    #[test]
    fn classify_suspicious_port_is_high() {
        let probe = probe_for_classify();
        let alert = probe.classify(&PortDelta::Open(31337));
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.message, "[ALERTA] Puerto 31337/tcp abierto (Backdoor común)");
    }

    #[test]
    fn classify_unknown_service_is_medium() {
        let probe = probe_for_classify();
        let alert = probe.classify(&PortDelta::Open(40000));
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.message, "[ADVERTENCIA] Puerto 40000/tcp (Desconocido) abierto");
    }

    #[test]
    fn classify_known_service_is_low() {
        let probe = probe_for_classify();
        let alert = probe.classify(&PortDelta::Open(22));
        assert_eq!(alert.severity, Severity::Low);
        assert_eq!(alert.message, "[OK] Puerto 22/tcp (SSH) abierto");
    }

    #[test]
    fn scenario_mixed_open_set_classification() {
        // open set {22, 31337, 54321, 50000}: High for 31337 and 54321,
        // Medium for 50000 (no service entry), Low for 22 (not counted).
        let probe = probe_for_classify();
        let classified: Vec<Severity> = [22u16, 31337, 54321, 50000]
            .iter()
            .map(|&port| probe.classify(&PortDelta::Open(port)).severity)
            .collect();
        let high = classified.iter().filter(|&&s| s == Severity::High).count();
        let medium = classified.iter().filter(|&&s| s == Severity::Medium).count();
        let low = classified.iter().filter(|&&s| s == Severity::Low).count();
        assert_eq!((high, medium, low), (2, 1, 1));
    }

    #[test]
    fn diff_classifies_every_currently_open_port() {
        let probe = probe_for_classify();
        let current = PortObservation { open_ports: vec![22, 31337] };
        let deltas = probe.diff(None, &current);
        assert!(deltas.contains(&PortDelta::Open(22)));
        assert!(deltas.contains(&PortDelta::Open(31337)));
    }

    #[test]
    fn diff_suppresses_change_deltas_on_first_sample() {
        let probe = probe_for_classify();
        let current = PortObservation { open_ports: vec![22] };
        let deltas = probe.diff(None, &current);
        assert!(!deltas.iter().any(|d| matches!(d, PortDelta::Opened(_) | PortDelta::Closed(_))));
    }

    #[test]
    fn diff_detects_opened_and_closed_ports() {
        let probe = probe_for_classify();
        let previous = PortObservation { open_ports: vec![22, 80] };
        let current = PortObservation { open_ports: vec![22, 443] };
        let deltas = probe.diff(Some(&previous), &current);
        assert!(deltas.contains(&PortDelta::Opened(443)));
        assert!(deltas.contains(&PortDelta::Closed(80)));
        assert!(!deltas.iter().any(|d| matches!(d, PortDelta::Opened(22))));
    }
}
