//! In-memory donor record store for testing.
//!
//! Implements both ports over plain vectors with synchronous, deterministic
//! behavior, plus failure switches to exercise the degradation paths.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This is acceptable
//! for test code but this adapter should NOT be used in production.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::donation::{
    BloodBankUnit, BloodCollectionRecord, Donation, EligibilityRecord, MedicalHistoryRecord,
    ResolvedStatus, StatusHistoryEntry,
};
use crate::domain::foundation::{DomainError, DonationId, DonorId, Timestamp};
use crate::ports::{DonationStatusWriter, DonorRecordReader};

#[derive(Default)]
struct Failures {
    writes: bool,
    bank_unit_all: bool,
    bank_unit_donors: Vec<String>,
}

/// In-memory implementation of the reader and writer ports.
#[derive(Default)]
pub struct InMemoryDonorStore {
    donations: RwLock<Vec<Donation>>,
    history: RwLock<Vec<StatusHistoryEntry>>,
    eligibility: RwLock<Vec<EligibilityRecord>>,
    bank_units: RwLock<Vec<BloodBankUnit>>,
    collections: RwLock<Vec<BloodCollectionRecord>>,
    medical_histories: RwLock<Vec<MedicalHistoryRecord>>,
    failures: RwLock<Failures>,
    writes: RwLock<usize>,
}

impl InMemoryDonorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding helpers ===

    pub fn insert_donation(&self, donation: Donation) {
        self.donations.write().expect("lock poisoned").push(donation);
    }

    pub fn insert_history_entry(&self, entry: StatusHistoryEntry) {
        self.history.write().expect("lock poisoned").push(entry);
    }

    pub fn insert_eligibility(&self, record: EligibilityRecord) {
        self.eligibility.write().expect("lock poisoned").push(record);
    }

    pub fn insert_bank_unit(&self, unit: BloodBankUnit) {
        self.bank_units.write().expect("lock poisoned").push(unit);
    }

    pub fn insert_collection(&self, record: BloodCollectionRecord) {
        self.collections.write().expect("lock poisoned").push(record);
    }

    pub fn insert_medical_history(&self, record: MedicalHistoryRecord) {
        self.medical_histories
            .write()
            .expect("lock poisoned")
            .push(record);
    }

    // === Failure switches ===

    /// Makes every status cache write fail.
    pub fn fail_writes(&self) {
        self.failures.write().expect("lock poisoned").writes = true;
    }

    /// Makes every bank unit fetch fail with a retryable error.
    pub fn fail_bank_unit_fetches(&self) {
        self.failures.write().expect("lock poisoned").bank_unit_all = true;
    }

    /// Makes bank unit fetches fail for one donor only.
    pub fn fail_bank_unit_fetches_for(&self, donor_id: &str) {
        self.failures
            .write()
            .expect("lock poisoned")
            .bank_unit_donors
            .push(donor_id.to_string());
    }

    // === Assertion helpers ===

    /// Returns the cached status currently stored for a donation.
    pub fn cached_status(&self, donation_id: &DonationId) -> Option<ResolvedStatus> {
        self.donations
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|d| &d.donation_id == donation_id)
            .and_then(|d| d.current_status)
    }

    /// Number of successful cache writes performed.
    pub fn write_count(&self) -> usize {
        *self.writes.read().expect("lock poisoned")
    }

    fn eligibility_sort_key(record: &EligibilityRecord) -> Timestamp {
        record.collection_start_time.unwrap_or(record.created_at)
    }
}

#[async_trait]
impl DonorRecordReader for InMemoryDonorStore {
    async fn donations(&self, donor_id: &DonorId) -> Result<Vec<Donation>, DomainError> {
        let mut rows: Vec<Donation> = self
            .donations
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|d| &d.donor_id == donor_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(rows)
    }

    async fn status_history(
        &self,
        donation_id: &DonationId,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError> {
        let mut rows: Vec<StatusHistoryEntry> = self
            .history
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|e| &e.donation_id == donation_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        Ok(rows)
    }

    async fn latest_eligibility(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<EligibilityRecord>, DomainError> {
        Ok(self
            .eligibility
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|r| &r.donor_id == donor_id)
            .max_by_key(|r| Self::eligibility_sort_key(r))
            .cloned())
    }

    async fn latest_bank_unit(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodBankUnit>, DomainError> {
        {
            let failures = self.failures.read().expect("lock poisoned");
            if failures.bank_unit_all
                || failures
                    .bank_unit_donors
                    .iter()
                    .any(|d| d == donor_id.as_str())
            {
                return Err(DomainError::source_unavailable(
                    "blood_bank_units",
                    "simulated fetch failure",
                ));
            }
        }
        Ok(self
            .bank_units
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|u| &u.donor_id == donor_id)
            .max_by_key(|u| u.created_at)
            .cloned())
    }

    async fn latest_collection(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodCollectionRecord>, DomainError> {
        Ok(self
            .collections
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|c| &c.donor_id == donor_id)
            .max_by_key(|c| c.start_time)
            .cloned())
    }

    async fn latest_medical_history(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<MedicalHistoryRecord>, DomainError> {
        Ok(self
            .medical_histories
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|m| &m.donor_id == donor_id)
            .max_by_key(|m| m.created_at)
            .cloned())
    }

    async fn donor_ids(&self) -> Result<Vec<DonorId>, DomainError> {
        let mut ids: Vec<DonorId> = Vec::new();
        for donation in self.donations.read().expect("lock poisoned").iter() {
            if !ids.contains(&donation.donor_id) {
                ids.push(donation.donor_id.clone());
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl DonationStatusWriter for InMemoryDonorStore {
    async fn update_current_status(
        &self,
        donation_id: &DonationId,
        status: ResolvedStatus,
    ) -> Result<(), DomainError> {
        if self.failures.read().expect("lock poisoned").writes {
            return Err(DomainError::source_unavailable(
                "donations",
                "simulated write failure",
            ));
        }
        let mut donations = self.donations.write().expect("lock poisoned");
        let Some(donation) = donations
            .iter_mut()
            .find(|d| &d.donation_id == donation_id)
        else {
            return Err(DomainError::new(
                crate::domain::foundation::ErrorCode::DonationNotFound,
                format!("Donation not found: {}", donation_id),
            ));
        };
        donation.current_status = Some(status);
        donation.last_updated = Timestamp::now();
        *self.writes.write().expect("lock poisoned") += 1;
        Ok(())
    }
}
