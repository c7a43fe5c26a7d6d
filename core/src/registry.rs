//! # Device Registry
//!
//! Merges the findings of all three scanning stages into one record per
//! address. Every mutation goes through a single lock so the port list and the
//! MAC of a record are always seen together.

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lanprobe_common::event::{Event, EventKind};
use lanprobe_common::network::device::DeviceRecord;
use pnet::util::MacAddr;
use tracing::trace;

use crate::bus::EventBus;

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Mutex<HashMap<Ipv4Addr, DeviceRecord>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the three event kinds on `bus` to this registry.
    pub fn subscribe_to(self: &Arc<Self>, bus: &EventBus) {
        let registry = Arc::clone(self);
        bus.subscribe(EventKind::HostFound, move |event| {
            if let Event::HostFound { address, .. } = event {
                registry.on_host_found(*address);
            }
            Ok(())
        });

        let registry = Arc::clone(self);
        bus.subscribe(EventKind::PortFound, move |event| {
            if let Event::PortFound { address, port } = event {
                registry.on_port_found(*address, *port);
            }
            Ok(())
        });

        let registry = Arc::clone(self);
        bus.subscribe(EventKind::MacFound, move |event| {
            if let Event::MacFound { address, mac } = event {
                registry.on_mac_found(*address, *mac);
            }
            Ok(())
        });
    }

    /// Creates the record for `address`. An existing record is left untouched.
    pub fn on_host_found(&self, address: Ipv4Addr) {
        self.lock()
            .entry(address)
            .or_insert_with(|| DeviceRecord::new(address));
    }

    /// Appends `port`, duplicates included. Unknown addresses are ignored.
    pub fn on_port_found(&self, address: Ipv4Addr, port: u16) {
        match self.lock().get_mut(&address) {
            Some(record) => record.ports.push(port),
            None => trace!("dropping port {port} of unknown host {address}"),
        }
    }

    /// Overwrites the MAC, last write wins. Unknown addresses are ignored.
    pub fn on_mac_found(&self, address: Ipv4Addr, mac: MacAddr) {
        match self.lock().get_mut(&address) {
            Some(record) => record.mac = Some(mac),
            None => trace!("dropping mac {mac} of unknown host {address}"),
        }
    }

    /// Point-in-time copy of every record, ordered by address.
    pub fn snapshot(&self) -> BTreeMap<Ipv4Addr, DeviceRecord> {
        self.lock()
            .iter()
            .map(|(address, record)| (*address, record.clone()))
            .collect()
    }

    pub fn get(&self, address: Ipv4Addr) -> Option<DeviceRecord> {
        self.lock().get(&address).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forgets every record, ahead of a new run.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Ipv4Addr, DeviceRecord>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
