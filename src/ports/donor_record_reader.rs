//! Donor record reader port (read side).
//!
//! Typed read accessors for the five record kinds, each fetched by donor
//! identity, most-recent-first. Implementations translate the store's raw
//! status strings into the closed domain enums exactly once.
//!
//! # Design
//!
//! - **Independent fetches**: no ordering dependency between sources, the
//!   application layer issues them concurrently.
//! - **Per-fetch timeouts**: a fetch either returns data, returns empty, or
//!   fails with a retryable `SOURCE_UNAVAILABLE` error. Implementations
//!   must not silently treat timeouts as "absent" - priority resolution
//!   depends on knowing a source truly had no record.

use async_trait::async_trait;

use crate::domain::donation::{
    BloodBankUnit, BloodCollectionRecord, Donation, EligibilityRecord, MedicalHistoryRecord,
    StatusHistoryEntry,
};
use crate::domain::foundation::{DomainError, DonationId, DonorId};

/// Reader port over the five donor data sources.
#[async_trait]
pub trait DonorRecordReader: Send + Sync {
    /// All donations for a donor, most recent first by `last_updated`.
    async fn donations(&self, donor_id: &DonorId) -> Result<Vec<Donation>, DomainError>;

    /// Status history for one donation, most recent first by `changed_at`.
    async fn status_history(
        &self,
        donation_id: &DonationId,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError>;

    /// Latest clinical eligibility record for a donor, if any.
    async fn latest_eligibility(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<EligibilityRecord>, DomainError>;

    /// Latest blood bank inventory unit for a donor, if any.
    async fn latest_bank_unit(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodBankUnit>, DomainError>;

    /// Latest blood collection record for a donor, if any.
    async fn latest_collection(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodCollectionRecord>, DomainError>;

    /// Latest medical history record for a donor, if any.
    async fn latest_medical_history(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<MedicalHistoryRecord>, DomainError>;

    /// All donor ids with at least one donation (for batch recompute).
    async fn donor_ids(&self) -> Result<Vec<DonorId>, DomainError>;
}
