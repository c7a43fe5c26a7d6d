pub mod arp;
pub mod tcp;
