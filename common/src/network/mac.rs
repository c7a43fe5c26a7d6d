use std::str::FromStr;

use pnet::util::MacAddr;

/// Parses a link-layer address as printed by neighbour tables.
///
/// Accepts `:` or `-` separators and single-digit groups (`0:1b:2:...` as
/// emitted by BSD `arp`). Returns `None` for malformed text and for the
/// all-zero placeholder of incomplete entries.
pub fn parse_neighbor_mac(text: &str) -> Option<MacAddr> {
    let raw: Vec<&str> = text.trim().split([':', '-']).collect();
    if raw.len() != 6 || raw.iter().any(|g| g.is_empty() || g.len() > 2) {
        return None;
    }

    let groups: Vec<String> = raw.iter().map(|g| format!("{g:0>2}")).collect();

    let mac = MacAddr::from_str(&groups.join(":")).ok()?;
    (mac != MacAddr::zero()).then_some(mac)
}
