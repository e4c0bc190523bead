//! Raw wire records for the hosted data store.
//!
//! External tables store statuses, dates and ids as strings with
//! inconsistent casing and missing fields. These DTOs mirror the wire
//! shape; `into_domain` is the single normalization boundary into the
//! domain's typed records. Unknown status strings become `None` (or the
//! documented catch-all variant), never an error; malformed ids or dates
//! on a record make that record unusable and error out.

use serde::Deserialize;
use tracing::warn;

use crate::domain::donation::{
    BloodBankUnit, BloodBankUnitStatus, BloodCollectionRecord, BloodType, Donation,
    EligibilityDecision, EligibilityRecord, MedicalHistoryRecord, ResolvedStatus,
    StatusHistoryEntry,
};
use crate::domain::foundation::{DomainError, DonorId, ErrorCode, Timestamp};

fn parse_timestamp(field: &str, value: &str) -> Result<Timestamp, DomainError> {
    Timestamp::parse(value).map_err(|e| {
        DomainError::new(ErrorCode::DatastoreError, format!("Unparseable timestamp: {}", e))
            .with_detail("field", field)
    })
}

fn parse_opt_timestamp(field: &str, value: Option<&str>) -> Result<Option<Timestamp>, DomainError> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}

fn parse_id<T>(field: &str, value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        DomainError::new(ErrorCode::DatastoreError, format!("Malformed id: {}", e))
            .with_detail("field", field)
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDonation {
    pub id: String,
    pub donor_id: String,
    #[serde(default)]
    pub current_status: Option<String>,
    pub donation_date: String,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub units_collected: Option<u32>,
    #[serde(default)]
    pub medical_history_completed: Option<bool>,
    #[serde(default)]
    pub physical_examination_completed: Option<bool>,
    #[serde(default)]
    pub screening_completed: Option<bool>,
    #[serde(default)]
    pub blood_collection_completed: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl RawDonation {
    pub fn into_domain(self) -> Result<Donation, DomainError> {
        let donation_date = parse_timestamp("donation_date", &self.donation_date)?;
        let current_status = self.current_status.as_deref().and_then(|raw| {
            let status = ResolvedStatus::from_raw(raw);
            if status.is_none() {
                warn!(raw, "unrecognized cached donation status, treating as absent");
            }
            status
        });

        Ok(Donation {
            donation_id: parse_id("id", &self.id)?,
            donor_id: DonorId::new(self.donor_id)
                .map_err(|e| DomainError::new(ErrorCode::DatastoreError, e.to_string()))?,
            current_status,
            donation_date,
            blood_type: self.blood_type.as_deref().and_then(BloodType::from_raw),
            units_collected: self.units_collected.unwrap_or(1),
            medical_history_completed: self.medical_history_completed.unwrap_or(false),
            physical_examination_completed: self.physical_examination_completed.unwrap_or(false),
            screening_completed: self.screening_completed.unwrap_or(false),
            blood_collection_completed: self.blood_collection_completed.unwrap_or(false),
            notes: self.notes,
            last_updated: parse_opt_timestamp("last_updated", self.last_updated.as_deref())?
                .unwrap_or(donation_date),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusHistoryEntry {
    pub donation_id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub changed_at: String,
}

impl RawStatusHistoryEntry {
    pub fn into_domain(self) -> Result<StatusHistoryEntry, DomainError> {
        Ok(StatusHistoryEntry {
            donation_id: parse_id("donation_id", &self.donation_id)?,
            status: self.status.as_deref().and_then(ResolvedStatus::from_raw),
            changed_at: parse_timestamp("changed_at", &self.changed_at)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEligibilityRecord {
    pub donor_id: String,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub collection_successful: Option<bool>,
    #[serde(default)]
    pub blood_collection_id: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub collection_start_time: Option<String>,
    pub created_at: String,
}

impl RawEligibilityRecord {
    pub fn into_domain(self) -> Result<EligibilityRecord, DomainError> {
        // A missing or unrecognized decision is the catch-all `Other`:
        // presence of the record matters even when the decision does not.
        let decision = self
            .decision
            .as_deref()
            .map(EligibilityDecision::from_raw)
            .unwrap_or(EligibilityDecision::Other);

        Ok(EligibilityRecord {
            donor_id: DonorId::new(self.donor_id)
                .map_err(|e| DomainError::new(ErrorCode::DatastoreError, e.to_string()))?,
            decision,
            collection_successful: self.collection_successful.unwrap_or(false),
            blood_collection_id: self
                .blood_collection_id
                .as_deref()
                .map(|v| parse_id("blood_collection_id", v))
                .transpose()?,
            blood_type: self.blood_type.as_deref().and_then(BloodType::from_raw),
            collection_start_time: parse_opt_timestamp(
                "collection_start_time",
                self.collection_start_time.as_deref(),
            )?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBloodBankUnit {
    pub id: String,
    pub donor_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub handed_over_at: Option<String>,
    #[serde(default)]
    pub disposed_at: Option<String>,
    #[serde(default)]
    pub hospital_from: Option<String>,
    #[serde(default)]
    pub units: Option<u32>,
    pub created_at: String,
}

impl RawBloodBankUnit {
    pub fn into_domain(self) -> Result<BloodBankUnit, DomainError> {
        Ok(BloodBankUnit {
            unit_id: parse_id("id", &self.id)?,
            donor_id: DonorId::new(self.donor_id)
                .map_err(|e| DomainError::new(ErrorCode::DatastoreError, e.to_string()))?,
            status: self
                .status
                .as_deref()
                .map(BloodBankUnitStatus::from_raw)
                .unwrap_or(BloodBankUnitStatus::Unknown),
            handed_over_at: parse_opt_timestamp("handed_over_at", self.handed_over_at.as_deref())?,
            disposed_at: parse_opt_timestamp("disposed_at", self.disposed_at.as_deref())?,
            hospital_from: self.hospital_from,
            units: self.units.unwrap_or(1),
            created_at: parse_timestamp("created_at", &self.created_at)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBloodCollection {
    pub id: String,
    pub donor_id: String,
    #[serde(default)]
    pub amount_taken: Option<u32>,
    pub start_time: String,
}

impl RawBloodCollection {
    pub fn into_domain(self) -> Result<BloodCollectionRecord, DomainError> {
        Ok(BloodCollectionRecord {
            collection_id: parse_id("id", &self.id)?,
            donor_id: DonorId::new(self.donor_id)
                .map_err(|e| DomainError::new(ErrorCode::DatastoreError, e.to_string()))?,
            amount_taken: self.amount_taken.unwrap_or(1),
            start_time: parse_timestamp("start_time", &self.start_time)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedicalHistory {
    pub donor_id: String,
    #[serde(default)]
    pub medical_approval: Option<bool>,
    pub created_at: String,
}

impl RawMedicalHistory {
    pub fn into_domain(self) -> Result<MedicalHistoryRecord, DomainError> {
        Ok(MedicalHistoryRecord {
            donor_id: DonorId::new(self.donor_id)
                .map_err(|e| DomainError::new(ErrorCode::DatastoreError, e.to_string()))?,
            medical_approval: self.medical_approval.unwrap_or(false),
            created_at: parse_timestamp("created_at", &self.created_at)?,
        })
    }
}

/// Projection used when listing donor ids for a sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDonorRef {
    pub donor_id: String,
}
