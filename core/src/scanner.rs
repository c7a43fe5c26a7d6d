//! The probing **abstractions** and the three scanning stages built on them.
//!
//! Scanners own the "what to probe, what to publish" logic; the probes behind
//! them own the "how to touch the network" part. The orchestrator only depends
//! on the traits below, so any probe can be swapped out (tests use fakes).
//!
//! Probe failures never surface as errors from a scanner: a host that cannot be
//! reached, a closed port and an unresolved MAC are all plain absences. The only
//! error a scanner returns is a subscriber failing while handling its event.

use std::net::Ipv4Addr;
use std::sync::Arc;

use lanprobe_common::config::Config;
use pnet::util::MacAddr;

use crate::network::{arp::SystemNeighborTable, tcp::{TcpConnect, TcpHandshake}};

pub mod liveness;
pub mod mac;
pub mod port;

pub use liveness::IpScanner;
pub use mac::MacResolver;
pub use port::PortScanner;

/// Decides whether a host is up. Must bound its own running time.
pub trait Reachability: Send + Sync {
    fn is_reachable(&self, addr: Ipv4Addr) -> anyhow::Result<bool>;
}

/// Decides whether a single TCP port accepts connections.
pub trait PortProbe: Send + Sync {
    fn is_open(&self, addr: Ipv4Addr, port: u16) -> bool;
}

/// Looks up the link-layer address of a neighbour.
pub trait NeighborTable: Send + Sync {
    fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Option<MacAddr>>;
}

/// The probes a discovery run is built from.
#[derive(Clone)]
pub struct Probes {
    pub reachability: Arc<dyn Reachability>,
    pub ports: Arc<dyn PortProbe>,
    pub neighbors: Arc<dyn NeighborTable>,
}

impl Probes {
    /// Unprivileged probes against the real network.
    pub fn system(cfg: &Config) -> Self {
        Self {
            reachability: Arc::new(TcpHandshake::new(cfg.liveness_ports.clone(), cfg.liveness_timeout)),
            ports: Arc::new(TcpConnect::new(cfg.port_timeout)),
            neighbors: Arc::new(SystemNeighborTable::new(cfg.mac_timeout)),
        }
    }
}
