use std::time::Duration;

/// Compiled-in scan settings.
///
/// Not exposed on the command line; tests build their own with short timeouts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ports a liveness probe tries to reach. A host counts as live as soon as
    /// one of them completes or actively refuses the handshake.
    pub liveness_ports: Vec<u16>,
    pub liveness_timeout: Duration,

    /// Candidate TCP ports of the port scanner, probed in this order.
    pub probe_ports: Vec<u16>,
    pub port_timeout: Duration,

    /// Upper bound on waiting for a neighbour-table entry to show up.
    pub mac_timeout: Duration,

    pub sizing: SizingParams,
}

/// Inputs of the pool sizing law, see `lanprobe_core::sizing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParams {
    pub target_utilization: f64,
    pub wait_time: f64,
    pub compute_time: f64,
}

impl Default for SizingParams {
    /// I/O-bound estimate: workers spend most of their time blocked on probes.
    fn default() -> Self {
        Self {
            target_utilization: 0.9,
            wait_time: 1000.0,
            compute_time: 2.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            liveness_ports: vec![80, 443],
            liveness_timeout: Duration::from_millis(150),
            probe_ports: vec![
                21,   // FTP
                22,   // SSH
                23,   // Telnet
                25,   // SMTP
                53,   // DNS
                80,   // HTTP
                110,  // POP3
                135,  // MS RPC
                139,  // NetBIOS
                143,  // IMAP
                443,  // HTTPS
                445,  // SMB
                548,  // AFP
                631,  // IPP
                993,  // IMAPS
                995,  // POP3S
                1883, // MQTT
                3306, // MySQL
                3389, // RDP
                5432, // PostgreSQL
                5900, // VNC
                8080, // HTTP-Alt
                8443, // HTTPS-Alt
                9100, // JetDirect
            ],
            port_timeout: Duration::from_millis(300),
            mac_timeout: Duration::from_millis(500),
            sizing: SizingParams::default(),
        }
    }
}
