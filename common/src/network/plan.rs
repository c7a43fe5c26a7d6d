//! # Address-space partition
//!
//! The private blocks swept by a discovery run. Each class is handed to one
//! worker task which walks its subnets one after another.

use std::fmt;

use super::range::ScanRange;

const HOSTS_PER_SUBNET: u16 = 255;
const _: () = assert!(HOSTS_PER_SUBNET <= ScanRange::MAX_HOSTS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressClass {
    A,
    B,
    C,
}

impl AddressClass {
    pub const ALL: [AddressClass; 3] = [AddressClass::A, AddressClass::B, AddressClass::C];

    /// First two octets shared by every subnet of the class.
    pub fn base_prefix(self) -> [u8; 2] {
        match self {
            AddressClass::A => [10, 0],
            AddressClass::B => [172, 16],
            AddressClass::C => [192, 168],
        }
    }

    pub fn subnet_count(self) -> u16 {
        match self {
            AddressClass::A | AddressClass::C => 255,
            AddressClass::B => 16,
        }
    }

    pub fn hosts_per_subnet(self) -> u16 {
        HOSTS_PER_SUBNET
    }

    /// The subnets of this class in scan order: `<prefix>.<i>.0` for
    /// `i in 0..subnet_count`.
    pub fn ranges(self) -> impl Iterator<Item = ScanRange> {
        let [a, b] = self.base_prefix();
        let hosts = self.hosts_per_subnet();
        (0..self.subnet_count()).map(move |i| ScanRange::subnet([a, b, i as u8], hosts))
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.base_prefix();
        let name = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
        };
        write!(f, "{name} ({a}.{b}.x.0)")
    }
}
