//! End-to-end tests of the discovery engine against an in-memory network.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod fakes;
