//! Shared vocabulary of the lanprobe workspace.
//!
//! Everything here is plain data: the events flowing over the bus, the address
//! plan being scanned, the per-device records and the compiled-in configuration.

pub mod config;
pub mod error;
pub mod event;
pub mod network;
