use std::net::Ipv4Addr;
use std::sync::Arc;

use lanprobe_common::event::Event;
use tracing::debug;

use super::PortProbe;
use crate::bus::EventBus;

/// Tries a fixed list of TCP ports on one host.
pub struct PortScanner {
    bus: Arc<EventBus>,
    probe: Arc<dyn PortProbe>,
    ports: Vec<u16>,
}

impl PortScanner {
    pub fn new(bus: Arc<EventBus>, probe: Arc<dyn PortProbe>, ports: Vec<u16>) -> Self {
        Self { bus, probe, ports }
    }

    /// Publishes `PortFound` for every configured port that accepts a
    /// connection. Closed and filtered ports are skipped silently.
    pub fn scan(&self, address: Ipv4Addr) -> anyhow::Result<()> {
        for &port in &self.ports {
            if self.probe.is_open(address, port) {
                debug!("{address}:{port} is open");
                self.bus.publish(&Event::PortFound { address, port })?;
            }
        }
        Ok(())
    }
}
