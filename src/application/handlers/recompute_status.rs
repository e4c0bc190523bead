//! RecomputeStatusHandler - "recompute now" for one donor or all donors.
//!
//! Idempotent, externally triggered (poll-on-load, periodic client poll or
//! explicit admin action): re-runs the resolver and persists the resolved
//! value into the `Donation.current_status` cache. Stateless beyond that
//! write. One donor's failure never aborts a batch sweep; failures are
//! collected per donor in the summary.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::donation::resolver;
use crate::domain::foundation::{DomainError, DonorId, ErrorCode};
use crate::ports::{DonationStatusWriter, DonorRecordReader};

use super::snapshot_loader::SnapshotLoader;

/// Which donors to recompute.
#[derive(Debug, Clone)]
pub enum RecomputeScope {
    Donor(DonorId),
    All,
}

/// Command to recompute resolved statuses.
#[derive(Debug, Clone)]
pub struct RecomputeCommand {
    pub scope: RecomputeScope,
}

/// Per-donor failure in a batch sweep.
#[derive(Debug, Clone)]
pub struct RecomputeFailure {
    pub donor_id: DonorId,
    pub message: String,
    pub retryable: bool,
}

/// Outcome of a recompute run.
#[derive(Debug, Clone, Default)]
pub struct RecomputeSummary {
    /// Donors whose cached status was refreshed.
    pub updated: Vec<DonorId>,
    /// Donors whose cache already matched (or had nothing to cache).
    pub unchanged: Vec<DonorId>,
    pub errors: Vec<RecomputeFailure>,
}

/// Error type for the recompute command.
#[derive(Debug, Clone)]
pub enum RecomputeError {
    /// The donor listing itself could not be fetched.
    SourceUnavailable(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for RecomputeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecomputeError::SourceUnavailable(msg) => write!(f, "Source unavailable: {}", msg),
            RecomputeError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for RecomputeError {}

impl From<DomainError> for RecomputeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SourceUnavailable => RecomputeError::SourceUnavailable(err.message),
            _ => RecomputeError::Infrastructure(err.message),
        }
    }
}

/// Handler for the recompute trigger.
pub struct RecomputeStatusHandler {
    reader: Arc<dyn DonorRecordReader>,
    loader: SnapshotLoader,
    writer: Arc<dyn DonationStatusWriter>,
}

impl RecomputeStatusHandler {
    pub fn new(reader: Arc<dyn DonorRecordReader>, writer: Arc<dyn DonationStatusWriter>) -> Self {
        Self {
            loader: SnapshotLoader::new(reader.clone()),
            reader,
            writer,
        }
    }

    pub async fn handle(&self, cmd: RecomputeCommand) -> Result<RecomputeSummary, RecomputeError> {
        let donor_ids = match cmd.scope {
            RecomputeScope::Donor(id) => vec![id],
            RecomputeScope::All => self.reader.donor_ids().await?,
        };

        let mut summary = RecomputeSummary::default();
        for donor_id in donor_ids {
            match self.recompute_one(&donor_id).await {
                Ok(true) => summary.updated.push(donor_id),
                Ok(false) => summary.unchanged.push(donor_id),
                Err(err) => {
                    warn!(%donor_id, %err, "recompute failed for donor");
                    summary.errors.push(RecomputeFailure {
                        donor_id,
                        retryable: err.is_retryable(),
                        message: err.message,
                    });
                }
            }
        }

        info!(
            updated = summary.updated.len(),
            unchanged = summary.unchanged.len(),
            errors = summary.errors.len(),
            "recompute sweep finished"
        );
        Ok(summary)
    }

    /// Recomputes one donor; returns whether the cache was refreshed.
    async fn recompute_one(&self, donor_id: &DonorId) -> Result<bool, DomainError> {
        let snapshot = self.loader.load(donor_id).await?;

        let Some(latest) = snapshot.latest_donation() else {
            // Nothing to cache for donors without a donation record.
            return Ok(false);
        };

        let resolution = resolver::resolve(&snapshot);
        if latest.current_status == Some(resolution.status) {
            return Ok(false);
        }

        self.writer
            .update_current_status(&latest.donation_id, resolution.status)
            .await?;
        Ok(true)
    }
}
