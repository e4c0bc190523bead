//! Read-only record types for the five donor data sources.
//!
//! These entities are owned and mutated by external systems (clinical
//! workflow, staff tooling, inventory management). The core only reads the
//! latest instances per donor; raw status strings are already normalized
//! into closed enums by the data-source adapter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CollectionId, DonationId, DonorId, Timestamp, UnitId};

use super::status::{BloodBankUnitStatus, BloodType, EligibilityDecision, ResolvedStatus};

/// One donation cycle. A donor accumulates one of these per cycle;
/// "latest" is the max `last_updated`.
///
/// `current_status` is a cached, possibly-stale opinion maintained by other
/// subsystems. The resolver treats it as the lowest-priority signal; `None`
/// means the field was absent or did not normalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub donation_id: DonationId,
    pub donor_id: DonorId,
    pub current_status: Option<ResolvedStatus>,
    pub donation_date: Timestamp,
    pub blood_type: Option<BloodType>,
    pub units_collected: u32,
    pub medical_history_completed: bool,
    pub physical_examination_completed: bool,
    pub screening_completed: bool,
    pub blood_collection_completed: bool,
    /// Free-text staff notes; carries the cancellation reason when the
    /// cached status is `Cancelled`.
    pub notes: Option<String>,
    pub last_updated: Timestamp,
}

/// Append-only audit log entry for a donation's status changes.
///
/// `None` status means the raw string did not normalize; such entries are
/// skipped by the fallback rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub donation_id: DonationId,
    pub status: Option<ResolvedStatus>,
    pub changed_at: Timestamp,
}

/// Clinical approval decision for a donor.
/// "Latest" is the max of `(collection_start_time, created_at)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRecord {
    pub donor_id: DonorId,
    pub decision: EligibilityDecision,
    pub collection_successful: bool,
    pub blood_collection_id: Option<CollectionId>,
    pub blood_type: Option<BloodType>,
    pub collection_start_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Physical inventory state of the collected unit.
/// "Latest" is the max `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodBankUnit {
    pub unit_id: UnitId,
    pub donor_id: DonorId,
    pub status: BloodBankUnitStatus,
    pub handed_over_at: Option<Timestamp>,
    pub disposed_at: Option<Timestamp>,
    pub hospital_from: Option<String>,
    pub units: u32,
    pub created_at: Timestamp,
}

/// Actual collected volume, when the phlebotomy record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodCollectionRecord {
    pub collection_id: CollectionId,
    pub donor_id: DonorId,
    pub amount_taken: u32,
    pub start_time: Timestamp,
}

/// Existence alone signals that a donation cycle has been initiated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistoryRecord {
    pub donor_id: DonorId,
    pub medical_approval: bool,
    pub created_at: Timestamp,
}

/// A fixed snapshot of every source for one donor.
///
/// The resolver is a deterministic pure function of this snapshot; repeated
/// calls over the same snapshot return the same status.
#[derive(Debug, Clone)]
pub struct DonorSnapshot {
    pub donor_id: DonorId,
    /// All donations for the donor, most recent first by `last_updated`.
    pub donations: Vec<Donation>,
    /// Status history for the latest donation, most recent first.
    pub history: Vec<StatusHistoryEntry>,
    pub eligibility: Option<EligibilityRecord>,
    pub bank_unit: Option<BloodBankUnit>,
    pub collection: Option<BloodCollectionRecord>,
    pub medical_history: Option<MedicalHistoryRecord>,
}

impl DonorSnapshot {
    /// An empty snapshot for a donor with no records at all.
    pub fn empty(donor_id: DonorId) -> Self {
        Self {
            donor_id,
            donations: Vec::new(),
            history: Vec::new(),
            eligibility: None,
            bank_unit: None,
            collection: None,
            medical_history: None,
        }
    }

    /// The donation for the current cycle, if any.
    pub fn latest_donation(&self) -> Option<&Donation> {
        self.donations.first()
    }

    /// Most recent normalized history entry for the latest donation.
    pub fn latest_history_status(&self) -> Option<ResolvedStatus> {
        self.history.iter().find_map(|e| e.status)
    }

    /// A donor is unknown when no donation and no medical history exist.
    pub fn has_history(&self) -> bool {
        !self.donations.is_empty() || self.medical_history.is_some()
    }
}
