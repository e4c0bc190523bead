//! HTTP adapters - REST API implementations.

pub mod tracker;

// Re-export key types for convenience
pub use tracker::tracker_routes;
pub use tracker::TrackerAppState;
