//! # Error types
//!
//! Typed errors surfaced at the library boundary. Handler failures travel as
//! [`anyhow::Error`] since subscribers are free to fail for any reason.

use std::fmt;

use thiserror::Error;

use crate::network::plan::AddressClass;

/// Rejected inputs of the thread-pool sizing law.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SizingError {
    #[error("compute time must be strictly positive, got {0}")]
    NonPositiveComputeTime(f64),
    #[error("target utilization must be within (0, 1], got {0}")]
    InvalidUtilization(f64),
    #[error("wait time must not be negative, got {0}")]
    NegativeWaitTime(f64),
}

/// Rejected [`ScanRange`](crate::network::range::ScanRange) inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{0}' is not a dotted IPv4 address")]
    Malformed(String),
    #[error("base address {0} must end in a zero host octet")]
    NonZeroHostOctet(String),
    #[error("a range holds at most 256 hosts, got {0}")]
    TooManyHosts(u16),
}

/// Errors that stop a discovery run before or instead of scanning.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid pool sizing parameters: {0}")]
    Sizing(#[from] SizingError),
    #[error("failed to build the worker pool: {0}")]
    ThreadPool(String),
    #[error("a discovery run is already in progress")]
    AlreadyRunning,
}

/// A class task that ended early because a subscriber failed.
#[derive(Debug)]
pub struct ClassFailure {
    pub class: AddressClass,
    pub error: anyhow::Error,
}

impl fmt::Display for ClassFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} aborted: {:#}", self.class, self.error)
    }
}
