use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// Everything learned about one address during a run.
///
/// `ports` is an observed-event log: a port reported twice shows up twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub address: Ipv4Addr,
    pub ports: Vec<u16>,
    pub mac: Option<MacAddr>,
}

impl DeviceRecord {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            ports: Vec::new(),
            mac: None,
        }
    }

    /// Ports in arrival order, comma separated.
    pub fn ports_joined(&self) -> String {
        self.ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<String>>()
            .join(", ")
    }
}
