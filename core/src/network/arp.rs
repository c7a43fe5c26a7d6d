//! Neighbour (ARP) table lookups.
//!
//! Reads the kernel's cache instead of sending ARP requests ourselves: the
//! liveness and port probes that precede a lookup already made the kernel
//! resolve the host, so the entry is normally there or about to be.

use std::net::Ipv4Addr;
use std::thread;
use std::time::{Duration, Instant};

use lanprobe_common::network::mac::parse_neighbor_mac;
use pnet::util::MacAddr;

use crate::scanner::NeighborTable;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Polls the system neighbour table until an entry appears or `timeout` ends.
pub struct SystemNeighborTable {
    timeout: Duration,
}

impl SystemNeighborTable {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl NeighborTable for SystemNeighborTable {
    fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Option<MacAddr>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(mac) = read_entry(addr)? {
                return Ok(Some(mac));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

#[cfg(target_os = "linux")]
fn read_entry(addr: Ipv4Addr) -> anyhow::Result<Option<MacAddr>> {
    use anyhow::Context;

    let table = std::fs::read_to_string("/proc/net/arp").context("reading /proc/net/arp")?;
    Ok(parse_proc_arp(&table, addr))
}

#[cfg(not(target_os = "linux"))]
fn read_entry(addr: Ipv4Addr) -> anyhow::Result<Option<MacAddr>> {
    use anyhow::Context;
    use std::process::Command;

    let flag = if cfg!(windows) { "-a" } else { "-n" };
    let output = Command::new("arp")
        .args([flag, &addr.to_string()])
        .output()
        .context("running arp")?;
    Ok(parse_arp_output(&String::from_utf8_lossy(&output.stdout), addr))
}

/// Finds `addr` in the contents of `/proc/net/arp`.
///
/// ```text
/// IP address       HW type     Flags       HW address            Mask     Device
/// 192.168.0.1      0x1         0x2         aa:bb:cc:dd:ee:ff     *        eth0
/// ```
pub fn parse_proc_arp(table: &str, addr: Ipv4Addr) -> Option<MacAddr> {
    table.lines().skip(1).find_map(|line| {
        let columns: Vec<&str> = line.split_whitespace().collect();
        match columns.as_slice() {
            [ip, _hw_type, _flags, hw_addr, ..] if ip.parse::<Ipv4Addr>().ok() == Some(addr) => {
                parse_neighbor_mac(hw_addr)
            }
            _ => None,
        }
    })
}

/// Finds `addr` in the output of the `arp` utility (BSD, macOS or Windows).
pub fn parse_arp_output(output: &str, addr: Ipv4Addr) -> Option<MacAddr> {
    let needle = addr.to_string();
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let mentions_addr = tokens
            .clone()
            .any(|token| token.trim_start_matches('(').trim_end_matches(')') == needle);
        if !mentions_addr {
            return None;
        }
        tokens.find_map(parse_neighbor_mac)
    })
}
