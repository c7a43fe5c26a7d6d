//! Discovery engine: event bus, probes, scanners, device registry and the
//! orchestrator tying them together.

pub mod bus;
pub mod discovery;
pub mod network;
pub mod registry;
pub mod scanner;
pub mod sizing;

pub use bus::EventBus;
pub use discovery::{DiscoveryReport, DiscoveryService, DiscoveryState};
pub use registry::DeviceRegistry;
pub use scanner::Probes;
