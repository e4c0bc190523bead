//! Closed status vocabularies for the donation pipeline.
//!
//! External tables store statuses as free-form strings with inconsistent
//! casing. Each raw string is normalized exactly once, at the data-source
//! adapter boundary, into these enums; the resolver never compares strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative pipeline position of a donation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedStatus {
    Registered,
    SampleCollected,
    Testing,
    TestingComplete,
    Processed,
    ReadyForUse,
    Stored,
    Allocated,
    Used,
    Expired,
    Cancelled,
}

impl ResolvedStatus {
    /// Normalizes a raw status string from an external table.
    ///
    /// Case-insensitive; accepts both spaced ("Sample Collected") and
    /// snake_case ("sample_collected") spellings. "Transfused" is an
    /// inventory synonym for `Used`. Unknown strings yield `None`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "registered" => Some(ResolvedStatus::Registered),
            "sample_collected" => Some(ResolvedStatus::SampleCollected),
            "testing" => Some(ResolvedStatus::Testing),
            "testing_complete" => Some(ResolvedStatus::TestingComplete),
            "processed" => Some(ResolvedStatus::Processed),
            "ready_for_use" => Some(ResolvedStatus::ReadyForUse),
            "stored" => Some(ResolvedStatus::Stored),
            "allocated" => Some(ResolvedStatus::Allocated),
            "used" | "transfused" => Some(ResolvedStatus::Used),
            "expired" => Some(ResolvedStatus::Expired),
            "cancelled" | "canceled" => Some(ResolvedStatus::Cancelled),
            _ => None,
        }
    }

    /// Human-readable label (the fixed wire vocabulary).
    pub fn label(&self) -> &'static str {
        match self {
            ResolvedStatus::Registered => "Registered",
            ResolvedStatus::SampleCollected => "Sample Collected",
            ResolvedStatus::Testing => "Testing",
            ResolvedStatus::TestingComplete => "Testing Complete",
            ResolvedStatus::Processed => "Processed",
            ResolvedStatus::ReadyForUse => "Ready for Use",
            ResolvedStatus::Stored => "Stored",
            ResolvedStatus::Allocated => "Allocated",
            ResolvedStatus::Used => "Used",
            ResolvedStatus::Expired => "Expired",
            ResolvedStatus::Cancelled => "Cancelled",
        }
    }

    /// Returns true if this status closes a donation cycle for eligibility
    /// purposes (the cooldown clock runs from such a donation).
    pub fn is_completed_cycle(&self) -> bool {
        matches!(
            self,
            ResolvedStatus::Processed
                | ResolvedStatus::ReadyForUse
                | ResolvedStatus::Stored
                | ResolvedStatus::Allocated
                | ResolvedStatus::Used
                | ResolvedStatus::Expired
        )
    }

    /// Returns true if the cycle is still moving through early processing.
    ///
    /// A donor whose only donation is in one of these states must wait for
    /// completion; there is no countdown to show.
    pub fn is_active_processing(&self) -> bool {
        matches!(
            self,
            ResolvedStatus::Registered
                | ResolvedStatus::SampleCollected
                | ResolvedStatus::Testing
                | ResolvedStatus::TestingComplete
        )
    }
}

impl fmt::Display for ResolvedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Physical inventory state of a collected unit, as recorded by the blood
/// bank tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodBankUnitStatus {
    Stored,
    Allocated,
    Used,
    Transfused,
    /// Inventory-management convention: a "buffer" unit has already been
    /// handed over, so it resolves the same as `Used`.
    Buffer,
    Processed,
    Valid,
    Unknown,
}

impl BloodBankUnitStatus {
    /// Normalizes a raw inventory status string.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stored" => BloodBankUnitStatus::Stored,
            "allocated" => BloodBankUnitStatus::Allocated,
            "used" => BloodBankUnitStatus::Used,
            "transfused" => BloodBankUnitStatus::Transfused,
            "buffer" => BloodBankUnitStatus::Buffer,
            "processed" => BloodBankUnitStatus::Processed,
            "valid" => BloodBankUnitStatus::Valid,
            _ => BloodBankUnitStatus::Unknown,
        }
    }
}

/// Clinical approval decision recorded on an eligibility record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityDecision {
    Approved,
    Eligible,
    Other,
}

impl EligibilityDecision {
    /// Normalizes a raw clinical decision string.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => EligibilityDecision::Approved,
            "eligible" => EligibilityDecision::Eligible,
            _ => EligibilityDecision::Other,
        }
    }

    /// Returns true if the decision clears the donor clinically.
    pub fn is_cleared(&self) -> bool {
        matches!(self, EligibilityDecision::Approved | EligibilityDecision::Eligible)
    }
}

/// ABO/Rh blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// Parses a blood type string ("A+", "o-", "AB+"...), case-insensitively.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A+" => Some(BloodType::APositive),
            "A-" => Some(BloodType::ANegative),
            "B+" => Some(BloodType::BPositive),
            "B-" => Some(BloodType::BNegative),
            "AB+" => Some(BloodType::AbPositive),
            "AB-" => Some(BloodType::AbNegative),
            "O+" => Some(BloodType::OPositive),
            "O-" => Some(BloodType::ONegative),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
