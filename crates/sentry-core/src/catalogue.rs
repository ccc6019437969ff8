//! Static service and threat catalogues used by the port probe to classify
//! an open port as an ordinary service or a known backdoor/threat signature.
//!
//! Both tables are small and closed, so they are compiled-in static maps
//! rather than a runtime-parsed data file (contrast
//! [`crate::resource_monitor`], which reads live `/proc` state).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Well-known service names, indexed by TCP port.
pub static SERVICE_CATALOGUE: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (139, "NetBIOS"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (445, "SMB"),
        (465, "SMTPS"),
        (587, "SMTP (envío)"),
        (993, "IMAPS"),
        (995, "POP3S"),
        (1433, "MSSQL"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5432, "PostgreSQL"),
        (5672, "RabbitMQ"),
        (6379, "Redis"),
        (9200, "Elasticsearch"),
        (27017, "MongoDB"),
    ])
});

/// Descriptions for ports commonly associated with malware, backdoors, or
/// remote-access trojans.
pub static THREAT_CATALOGUE: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1234, "Ultors Trojan"),
        (4444, "Metasploit"),
        (5555, "Android Debug"),
        (6666, "IRC/Backdoor"),
        (6667, "IRC"),
        (6969, "GateCrasher"),
        (7777, "Tini"),
        (8080, "Proxy alternativo"),
        (8888, "Proxy alternativo"),
        (9999, "Backdoor común"),
        (12345, "NetBus"),
        (31337, "Backdoor común"),
        (54321, "Back Orifice"),
    ])
});

/// Look up the well-known service name for a port, if any.
pub fn service_for_port(port: u16) -> Option<&'static str> {
    SERVICE_CATALOGUE.get(&port).copied()
}

/// Look up the threat description for a port, if any.
pub fn threat_for_port(port: u16) -> Option<&'static str> {
    THREAT_CATALOGUE.get(&port).copied()
}
