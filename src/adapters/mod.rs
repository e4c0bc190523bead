//! Adapters - infrastructure implementations of the ports.

pub mod datastore;
pub mod http;
pub mod memory;
