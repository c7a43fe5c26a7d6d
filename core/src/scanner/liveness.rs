use std::net::Ipv4Addr;
use std::sync::Arc;

use lanprobe_common::event::{Event, ScannerId};
use lanprobe_common::network::range::ScanRange;
use tracing::{debug, trace};

use super::Reachability;
use crate::bus::EventBus;

/// Sweeps one [`ScanRange`] at a time, strictly in address order.
pub struct IpScanner {
    id: ScannerId,
    bus: Arc<EventBus>,
    probe: Arc<dyn Reachability>,
}

impl IpScanner {
    pub fn new(bus: Arc<EventBus>, probe: Arc<dyn Reachability>) -> Self {
        Self {
            id: ScannerId::next(),
            bus,
            probe,
        }
    }

    pub fn id(&self) -> ScannerId {
        self.id
    }

    /// Probes every candidate of `range` and publishes `HostFound` for each
    /// live one before moving on to the next address.
    ///
    /// Returns the number of live hosts. Fails only when a subscriber fails,
    /// in which case the rest of the range is left unprobed.
    pub fn scan(&self, range: &ScanRange) -> anyhow::Result<usize> {
        let mut live = 0;
        for address in range.to_iter() {
            if !self.probe_host(address) {
                continue;
            }
            live += 1;
            self.bus.publish(&Event::HostFound {
                address,
                scanner_id: self.id,
            })?;
        }
        debug!("{range}: {live} live host(s)");
        Ok(live)
    }

    fn probe_host(&self, address: Ipv4Addr) -> bool {
        match self.probe.is_reachable(address) {
            Ok(live) => live,
            Err(e) => {
                trace!("liveness probe of {address} failed: {e:#}");
                false
            }
        }
    }
}
