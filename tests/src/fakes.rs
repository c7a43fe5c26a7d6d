use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lanprobe_core::scanner::{NeighborTable, PortProbe, Probes, Reachability};
use pnet::util::MacAddr;

/// A deterministic network: fixed live hosts, open ports and MACs.
#[derive(Default)]
pub struct FakeNetwork {
    hosts: HashMap<Ipv4Addr, FakeHost>,
    port_probes: AtomicUsize,
}

#[derive(Default, Clone)]
struct FakeHost {
    open_ports: Vec<u16>,
    mac: Option<MacAddr>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, addr: Ipv4Addr) -> Self {
        self.hosts.entry(addr).or_default();
        self
    }

    pub fn open_port(mut self, addr: Ipv4Addr, port: u16) -> Self {
        self.hosts.entry(addr).or_default().open_ports.push(port);
        self
    }

    pub fn mac(mut self, addr: Ipv4Addr, mac: MacAddr) -> Self {
        self.hosts.entry(addr).or_default().mac = Some(mac);
        self
    }

    pub fn port_probes(&self) -> usize {
        self.port_probes.load(Ordering::Relaxed)
    }

    pub fn probes(self: &Arc<Self>) -> Probes {
        Probes {
            reachability: self.clone(),
            ports: self.clone(),
            neighbors: self.clone(),
        }
    }
}

impl Reachability for FakeNetwork {
    fn is_reachable(&self, addr: Ipv4Addr) -> anyhow::Result<bool> {
        Ok(self.hosts.contains_key(&addr))
    }
}

impl PortProbe for FakeNetwork {
    fn is_open(&self, addr: Ipv4Addr, port: u16) -> bool {
        self.port_probes.fetch_add(1, Ordering::Relaxed);
        self.hosts
            .get(&addr)
            .is_some_and(|host| host.open_ports.contains(&port))
    }
}

impl NeighborTable for FakeNetwork {
    fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Option<MacAddr>> {
        Ok(self.hosts.get(&addr).and_then(|host| host.mac))
    }
}
