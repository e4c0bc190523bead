//! Donation status writer port (write side).
//!
//! `Donation.current_status` is a cache of the resolved value, not a source
//! of truth: external clinical tooling writes the same field. Writes
//! through this port are advisory and idempotent; last-write-wins is
//! acceptable because the value is always re-derivable from the
//! source-of-truth tables.

use async_trait::async_trait;

use crate::domain::donation::ResolvedStatus;
use crate::domain::foundation::{DomainError, DonationId};

/// Writer port for the cached donation status.
#[async_trait]
pub trait DonationStatusWriter: Send + Sync {
    /// Persists the resolved status into `Donation.current_status`.
    ///
    /// Idempotent: the same snapshot always resolves to the same value, so
    /// repeating the write is harmless.
    async fn update_current_status(
        &self,
        donation_id: &DonationId,
        status: ResolvedStatus,
    ) -> Result<(), DomainError>;
}
