//! GetTrackerHandler - query handler for the donor tracker view.
//!
//! Loads the donor's snapshot, resolves the authoritative status, computes
//! eligibility and composes the tracker view. As a side effect the resolved
//! value is written back into `Donation.current_status` as a cache; that
//! write is advisory and its failure never fails the query.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::donation::{eligibility, resolver, tracker, TrackerView};
use crate::domain::foundation::{DomainError, DonorId, ErrorCode, Timestamp};
use crate::ports::{DonationStatusWriter, DonorRecordReader};

use super::snapshot_loader::SnapshotLoader;

/// Query to get the tracker view for one donor.
#[derive(Debug, Clone)]
pub struct GetTrackerQuery {
    pub donor_id: DonorId,
}

/// Error type for the tracker query.
#[derive(Debug, Clone)]
pub enum GetTrackerError {
    /// An authoritative data source failed; the operation is retryable.
    SourceUnavailable(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for GetTrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetTrackerError::SourceUnavailable(msg) => write!(f, "Source unavailable: {}", msg),
            GetTrackerError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for GetTrackerError {}

impl From<DomainError> for GetTrackerError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SourceUnavailable => GetTrackerError::SourceUnavailable(err.message),
            _ => GetTrackerError::Infrastructure(err.message),
        }
    }
}

/// Handler for the donor-facing and staff-facing tracker view.
pub struct GetTrackerHandler {
    loader: SnapshotLoader,
    writer: Arc<dyn DonationStatusWriter>,
}

impl GetTrackerHandler {
    pub fn new(reader: Arc<dyn DonorRecordReader>, writer: Arc<dyn DonationStatusWriter>) -> Self {
        Self {
            loader: SnapshotLoader::new(reader),
            writer,
        }
    }

    pub async fn handle(&self, query: GetTrackerQuery) -> Result<TrackerView, GetTrackerError> {
        let snapshot = self.loader.load(&query.donor_id).await?;
        let now = Timestamp::now();

        let resolution = resolver::resolve(&snapshot);
        let eligibility = eligibility::compute(&snapshot, resolution.status, now);
        let view = tracker::build(&snapshot, &resolution, eligibility, now);

        // Refresh the cached status when it drifted. Advisory only:
        // external writers share this field and the value is always
        // re-derivable, so a failed or raced write is harmless.
        if let Some(latest) = snapshot.latest_donation() {
            if latest.current_status != Some(resolution.status) {
                if let Err(err) = self
                    .writer
                    .update_current_status(&latest.donation_id, resolution.status)
                    .await
                {
                    warn!(donor_id = %query.donor_id, %err, "cache write failed, serving resolved view");
                }
            }
        }

        debug!(donor_id = %query.donor_id, status = %resolution.status, "tracker view built");
        Ok(view)
    }
}
