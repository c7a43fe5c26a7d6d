//! Blocking TCP probes.
//!
//! Neither probe needs raw sockets: a plain `connect()` with a deadline is
//! enough to tell an answering host or port from a silent one.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use crate::scanner::{PortProbe, Reachability};

/// Liveness by handshake: a host that completes *or actively refuses* a
/// connection on any of `ports` is up. Only silence means down.
pub struct TcpHandshake {
    ports: Vec<u16>,
    timeout: Duration,
}

impl TcpHandshake {
    pub fn new(ports: Vec<u16>, timeout: Duration) -> Self {
        Self { ports, timeout }
    }
}

impl Reachability for TcpHandshake {
    fn is_reachable(&self, addr: Ipv4Addr) -> anyhow::Result<bool> {
        for &port in &self.ports {
            let socket_addr = SocketAddr::from((addr, port));
            match TcpStream::connect_timeout(&socket_addr, self.timeout) {
                Ok(_) => return Ok(true),
                Err(e) if answered(e.kind()) => return Ok(true),
                Err(e) if silent(e.kind()) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(false)
    }
}

/// A full connect within `timeout` means open.
pub struct TcpConnect {
    timeout: Duration,
}

impl TcpConnect {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PortProbe for TcpConnect {
    fn is_open(&self, addr: Ipv4Addr, port: u16) -> bool {
        TcpStream::connect_timeout(&SocketAddr::from((addr, port)), self.timeout).is_ok()
    }
}

fn answered(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset)
}

fn silent(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut
            | ErrorKind::WouldBlock
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_millis(500);

    #[test]
    fn listening_port_is_open() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(TcpConnect::new(TIMEOUT).is_open(Ipv4Addr::LOCALHOST, port));
    }

    #[test]
    fn released_port_is_closed() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        assert!(!TcpConnect::new(TIMEOUT).is_open(Ipv4Addr::LOCALHOST, port));
    }

    #[test]
    fn refused_handshake_still_means_live() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let probe = TcpHandshake::new(vec![port], TIMEOUT);
        assert!(probe.is_reachable(Ipv4Addr::LOCALHOST).unwrap());
    }

    #[test]
    #[ignore]
    fn unroutable_host_is_not_live() {
        let probe = TcpHandshake::new(vec![443], Duration::from_millis(100));
        let result = probe.is_reachable(Ipv4Addr::new(203, 0, 113, 1));
        assert!(!result.unwrap_or(false));
    }
}
