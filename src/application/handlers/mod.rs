//! Use-case handlers.

mod get_tracker;
mod recompute_status;
mod snapshot_loader;

pub use get_tracker::{GetTrackerError, GetTrackerHandler, GetTrackerQuery};
pub use recompute_status::{
    RecomputeCommand, RecomputeError, RecomputeFailure, RecomputeScope, RecomputeStatusHandler,
    RecomputeSummary,
};
pub use snapshot_loader::SnapshotLoader;
