pub mod device;
pub mod mac;
pub mod plan;
pub mod range;
