//! # Discovery events
//!
//! The closed set of findings the scanners publish. Events are immutable once
//! built and cheap to clone.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};

use pnet::util::MacAddr;

static NEXT_SCANNER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one liveness-scanner instance.
///
/// Lets a `HostFound` subscriber ignore hosts reported by a scanner it was not
/// registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScannerId(u64);

impl ScannerId {
    /// Allocates an id never handed out before in this process.
    pub fn next() -> Self {
        Self(NEXT_SCANNER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scanner#{}", self.0)
    }
}

/// Tag used to route events to their subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HostFound,
    PortFound,
    MacFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A host answered the liveness probe.
    HostFound {
        address: Ipv4Addr,
        scanner_id: ScannerId,
    },
    /// A TCP port accepted a connection.
    PortFound { address: Ipv4Addr, port: u16 },
    /// The link-layer address of a host was resolved.
    MacFound { address: Ipv4Addr, mac: MacAddr },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::HostFound { .. } => EventKind::HostFound,
            Event::PortFound { .. } => EventKind::PortFound,
            Event::MacFound { .. } => EventKind::MacFound,
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        match self {
            Event::HostFound { address, .. }
            | Event::PortFound { address, .. }
            | Event::MacFound { address, .. } => *address,
        }
    }
}
