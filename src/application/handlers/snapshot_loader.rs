//! Snapshot loader - gathers every source for one donor.
//!
//! The five source fetches are independent and issued concurrently, but the
//! resolver needs all of them before producing a result: priority
//! resolution depends on knowing whether a higher-priority source has any
//! record, not just its absence due to a pending fetch.
//!
//! Failure policy follows source authority. A failed fetch on an
//! authoritative source (donations, eligibility, bank unit) aborts with a
//! retryable error; a failed fetch on a fallback-only source (history,
//! collection, medical history) degrades to "no data" with a warning,
//! since those sources can only refine, never decide.

use std::sync::Arc;

use tracing::warn;

use crate::domain::donation::DonorSnapshot;
use crate::domain::foundation::{DomainError, DonorId};
use crate::ports::DonorRecordReader;

/// Loads a consistent [`DonorSnapshot`] from the record reader.
pub struct SnapshotLoader {
    reader: Arc<dyn DonorRecordReader>,
}

impl SnapshotLoader {
    pub fn new(reader: Arc<dyn DonorRecordReader>) -> Self {
        Self { reader }
    }

    /// Fetches all sources for the donor and assembles the snapshot.
    pub async fn load(&self, donor_id: &DonorId) -> Result<DonorSnapshot, DomainError> {
        let (donations, eligibility, bank_unit, collection, medical_history) = futures::join!(
            self.reader.donations(donor_id),
            self.reader.latest_eligibility(donor_id),
            self.reader.latest_bank_unit(donor_id),
            self.reader.latest_collection(donor_id),
            self.reader.latest_medical_history(donor_id),
        );

        // Authoritative sources: a failure here would corrupt priority
        // resolution if treated as absence.
        let donations = donations?;
        let eligibility = eligibility?;
        let bank_unit = bank_unit?;

        let collection = Self::degrade(collection, "blood_collections", donor_id);
        let medical_history = Self::degrade(medical_history, "medical_histories", donor_id);

        // History is keyed by the latest donation and is fallback-only.
        let history = match donations.first() {
            Some(latest) => {
                match self.reader.status_history(&latest.donation_id).await {
                    Ok(entries) => entries,
                    Err(err) => {
                        warn!(%donor_id, %err, "status history unavailable, continuing without");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        Ok(DonorSnapshot {
            donor_id: donor_id.clone(),
            donations,
            history,
            eligibility,
            bank_unit,
            collection,
            medical_history,
        })
    }

    fn degrade<T>(
        result: Result<Option<T>, DomainError>,
        source: &str,
        donor_id: &DonorId,
    ) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(%donor_id, source, %err, "fallback source unavailable, treating as absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::{
        BloodBankUnit, BloodCollectionRecord, Donation, EligibilityRecord, MedicalHistoryRecord,
        ResolvedStatus, StatusHistoryEntry,
    };
    use crate::domain::foundation::{DonationId, ErrorCode, Timestamp};
    use async_trait::async_trait;

    /// Mock reader with per-source failure switches.
    struct MockReader {
        donations: Vec<Donation>,
        history: Vec<StatusHistoryEntry>,
        fail_donations: bool,
        fail_bank_unit: bool,
        fail_history: bool,
        fail_collection: bool,
    }

    impl MockReader {
        fn new() -> Self {
            Self {
                donations: Vec::new(),
                history: Vec::new(),
                fail_donations: false,
                fail_bank_unit: false,
                fail_history: false,
                fail_collection: false,
            }
        }

        fn unavailable(source: &str) -> DomainError {
            DomainError::source_unavailable(source, "simulated timeout")
        }
    }

    #[async_trait]
    impl DonorRecordReader for MockReader {
        async fn donations(&self, _donor_id: &DonorId) -> Result<Vec<Donation>, DomainError> {
            if self.fail_donations {
                return Err(Self::unavailable("donations"));
            }
            Ok(self.donations.clone())
        }

        async fn status_history(
            &self,
            _donation_id: &DonationId,
        ) -> Result<Vec<StatusHistoryEntry>, DomainError> {
            if self.fail_history {
                return Err(Self::unavailable("status_history"));
            }
            Ok(self.history.clone())
        }

        async fn latest_eligibility(
            &self,
            _donor_id: &DonorId,
        ) -> Result<Option<EligibilityRecord>, DomainError> {
            Ok(None)
        }

        async fn latest_bank_unit(
            &self,
            _donor_id: &DonorId,
        ) -> Result<Option<BloodBankUnit>, DomainError> {
            if self.fail_bank_unit {
                return Err(Self::unavailable("blood_bank_units"));
            }
            Ok(None)
        }

        async fn latest_collection(
            &self,
            _donor_id: &DonorId,
        ) -> Result<Option<BloodCollectionRecord>, DomainError> {
            if self.fail_collection {
                return Err(Self::unavailable("blood_collections"));
            }
            Ok(None)
        }

        async fn latest_medical_history(
            &self,
            _donor_id: &DonorId,
        ) -> Result<Option<MedicalHistoryRecord>, DomainError> {
            Ok(None)
        }

        async fn donor_ids(&self) -> Result<Vec<DonorId>, DomainError> {
            Ok(vec![])
        }
    }

    fn donor() -> DonorId {
        DonorId::new("donor-1").unwrap()
    }

    fn donation() -> Donation {
        Donation {
            donation_id: DonationId::new(),
            donor_id: donor(),
            current_status: Some(ResolvedStatus::Testing),
            donation_date: Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
            blood_type: None,
            units_collected: 1,
            medical_history_completed: true,
            physical_examination_completed: true,
            screening_completed: false,
            blood_collection_completed: false,
            notes: None,
            last_updated: Timestamp::parse("2024-01-02T00:00:00Z").unwrap(),
        }
    }

    #[tokio::test]
    async fn loads_empty_snapshot_for_unknown_donor() {
        let loader = SnapshotLoader::new(Arc::new(MockReader::new()));
        let snapshot = loader.load(&donor()).await.unwrap();
        assert!(!snapshot.has_history());
    }

    #[tokio::test]
    async fn authoritative_source_failure_aborts() {
        let mut reader = MockReader::new();
        reader.fail_bank_unit = true;

        let loader = SnapshotLoader::new(Arc::new(reader));
        let err = loader.load(&donor()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SourceUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn donations_failure_aborts() {
        let mut reader = MockReader::new();
        reader.fail_donations = true;

        let loader = SnapshotLoader::new(Arc::new(reader));
        assert!(loader.load(&donor()).await.is_err());
    }

    #[tokio::test]
    async fn fallback_source_failure_degrades_to_absent() {
        let mut reader = MockReader::new();
        reader.donations = vec![donation()];
        reader.fail_history = true;
        reader.fail_collection = true;

        let loader = SnapshotLoader::new(Arc::new(reader));
        let snapshot = loader.load(&donor()).await.unwrap();
        assert_eq!(snapshot.donations.len(), 1);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.collection.is_none());
    }

    #[tokio::test]
    async fn history_fetched_for_latest_donation() {
        let mut reader = MockReader::new();
        let d = donation();
        reader.history = vec![StatusHistoryEntry {
            donation_id: d.donation_id,
            status: Some(ResolvedStatus::Testing),
            changed_at: Timestamp::now(),
        }];
        reader.donations = vec![d];

        let loader = SnapshotLoader::new(Arc::new(reader));
        let snapshot = loader.load(&donor()).await.unwrap();
        assert_eq!(snapshot.history.len(), 1);
    }
}
