use std::net::Ipv4Addr;
use std::sync::Arc;

use lanprobe_common::event::Event;
use tracing::{debug, trace};

use super::NeighborTable;
use crate::bus::EventBus;

pub struct MacResolver {
    bus: Arc<EventBus>,
    table: Arc<dyn NeighborTable>,
}

impl MacResolver {
    pub fn new(bus: Arc<EventBus>, table: Arc<dyn NeighborTable>) -> Self {
        Self { bus, table }
    }

    /// Publishes a single `MacFound` when the neighbour table knows `address`.
    pub fn scan(&self, address: Ipv4Addr) -> anyhow::Result<()> {
        match self.table.lookup(address) {
            Ok(Some(mac)) => {
                debug!("{address} is at {mac}");
                self.bus.publish(&Event::MacFound { address, mac })
            }
            Ok(None) => {
                trace!("no neighbour entry for {address}");
                Ok(())
            }
            Err(e) => {
                trace!("neighbour lookup for {address} failed: {e:#}");
                Ok(())
            }
        }
    }
}
