//! Domain layer - pure decision logic.
//!
//! Nothing in this layer performs I/O. The resolver, stage mapper and
//! eligibility calculator are deterministic functions over a snapshot of
//! donor records supplied by the application layer.

pub mod donation;
pub mod foundation;
