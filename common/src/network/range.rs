use std::fmt;
use std::net::Ipv4Addr;

use crate::error::RangeError;

/// One block of candidate hosts sharing a `/24` prefix.
///
/// Candidates are derived by counting the last octet of `base` up from zero,
/// so `ScanRange::new(10.0.3.0, 255)` covers `10.0.3.0` through `10.0.3.254`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanRange {
    base: Ipv4Addr,
    host_count: u16,
}

impl ScanRange {
    pub const MAX_HOSTS: u16 = 256;

    pub fn new(base: Ipv4Addr, host_count: u16) -> Result<Self, RangeError> {
        if base.octets()[3] != 0 {
            return Err(RangeError::NonZeroHostOctet(base.to_string()));
        }
        if host_count > Self::MAX_HOSTS {
            return Err(RangeError::TooManyHosts(host_count));
        }
        Ok(Self { base, host_count })
    }

    /// The block `a.b.c.0`. The host octet is zero by construction; callers
    /// keep `host_count` within [`MAX_HOSTS`](Self::MAX_HOSTS).
    pub(crate) const fn subnet([a, b, c]: [u8; 3], host_count: u16) -> Self {
        Self {
            base: Ipv4Addr::new(a, b, c, 0),
            host_count,
        }
    }

    /// Builds a range from a dotted network prefix such as `"192.168.4.0"`.
    pub fn parse(base: &str, host_count: u16) -> Result<Self, RangeError> {
        let addr: Ipv4Addr = base
            .trim()
            .parse()
            .map_err(|_| RangeError::Malformed(base.to_string()))?;
        Self::new(addr, host_count)
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn host_count(&self) -> u16 {
        self.host_count
    }

    /// Candidate addresses in increasing order.
    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let [a, b, c, _] = self.base.octets();
        (0..self.host_count).map(move |host| Ipv4Addr::new(a, b, c, host as u8))
    }

}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{} hosts)", self.base, self.host_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_exactly_host_count_candidates() {
        let range = ScanRange::parse("10.0.0.0", 255).unwrap();
        let ips: Vec<Ipv4Addr> = range.to_iter().collect();

        assert_eq!(ips.len(), 255);
        assert_eq!(ips.first(), Some(&Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(ips.last(), Some(&Ipv4Addr::new(10, 0, 0, 254)));
    }

    #[test]
    fn full_block_reaches_last_octet() {
        let range = ScanRange::parse("192.168.1.0", 256).unwrap();
        assert_eq!(range.to_iter().last(), Some(Ipv4Addr::new(192, 168, 1, 255)));
    }

    #[test]
    fn empty_range_yields_nothing() {
        let range = ScanRange::parse("172.16.0.0", 0).unwrap();
        assert_eq!(range.to_iter().count(), 0);
    }

    #[test]
    fn rejects_non_zero_host_octet() {
        let err = ScanRange::parse("10.0.0.7", 10).unwrap_err();
        assert_eq!(err, RangeError::NonZeroHostOctet("10.0.0.7".into()));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            ScanRange::parse("10.0.x.0", 10),
            Err(RangeError::Malformed(_))
        ));
        assert!(matches!(
            ScanRange::parse("10.0.0.0", 300),
            Err(RangeError::TooManyHosts(300))
        ));
    }
}
