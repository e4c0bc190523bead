//! Status resolver - reconciles the five donor data sources into one
//! authoritative pipeline position.
//!
//! The five tables are written by independent systems and routinely
//! disagree. Rather than a transactional join, resolution is a fixed
//! priority cascade: each rule is consulted only if every higher-priority
//! rule yielded nothing. The cascade is expressed as named, independently
//! testable rule functions, and every disagreement the cascade papers over
//! is recorded as a diagnostic rather than silently dropped.

use tracing::warn;

use super::records::DonorSnapshot;
use super::status::{BloodBankUnitStatus, BloodType, ResolvedStatus};

/// Which cascade rule produced the resolved status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Terminal or inventory signal on the blood bank unit.
    BankUnit,
    /// Clinical eligibility record.
    EligibilityRecord,
    /// Cached `Donation.current_status` opinion.
    CachedStatus,
    /// Latest status-history entry, used as last-resort fallback.
    StatusHistory,
    /// No source yielded anything; the documented default applied.
    Default,
}

/// A cross-source disagreement observed during resolution.
///
/// Never fatal; resolution proceeds per priority order, but upstream
/// data-quality issues stay visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// The audit log's latest entry disagrees with the cached status.
    HistoryDisagreesWithCache {
        cached: ResolvedStatus,
        history: ResolvedStatus,
    },
    /// The eligibility record implies a different stage than the bank unit.
    EligibilityDisagreesWithBankUnit {
        bank_unit: ResolvedStatus,
        eligibility: ResolvedStatus,
    },
    /// No source had an opinion; the default status was applied.
    DefaultStatusApplied,
}

/// Outcome of resolving one donor's snapshot.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: ResolvedStatus,
    pub source: ResolutionSource,
    pub blood_type: Option<BloodType>,
    /// Populated only when the cycle was cancelled via the cached status.
    pub cancellation_reason: Option<String>,
    pub inconsistencies: Vec<Inconsistency>,
}

/// Resolves the authoritative current status for one donor.
///
/// Deterministic pure function of the snapshot: no hidden state, no
/// dependency on query order.
pub fn resolve(snapshot: &DonorSnapshot) -> Resolution {
    let bank = bank_unit_rule(snapshot);
    let clinical = eligibility_rule(snapshot);
    let cached = cached_status_rule(snapshot);
    let history = history_fallback_rule(snapshot);

    let mut inconsistencies = Vec::new();

    let (status, source) = if let Some(status) = bank {
        if let Some(other) = clinical {
            if other != status {
                inconsistencies.push(Inconsistency::EligibilityDisagreesWithBankUnit {
                    bank_unit: status,
                    eligibility: other,
                });
            }
        }
        (status, ResolutionSource::BankUnit)
    } else if let Some(status) = clinical {
        (status, ResolutionSource::EligibilityRecord)
    } else if let Some(status) = cached {
        // The audit log never overrides the cached opinion, but a
        // disagreement is surfaced rather than silently dropped.
        if let Some(other) = history {
            if other != status {
                inconsistencies.push(Inconsistency::HistoryDisagreesWithCache {
                    cached: status,
                    history: other,
                });
            }
        }
        (status, ResolutionSource::CachedStatus)
    } else if let Some(status) = history {
        (status, ResolutionSource::StatusHistory)
    } else {
        // Preserved from observed behavior; an open question, hence the
        // diagnostic rather than a silent guess.
        inconsistencies.push(Inconsistency::DefaultStatusApplied);
        (ResolvedStatus::Processed, ResolutionSource::Default)
    };

    for inconsistency in &inconsistencies {
        warn!(donor_id = %snapshot.donor_id, ?inconsistency, "status resolution inconsistency");
    }

    // Cancellation short-circuits: no blood type reconciliation, surface
    // the staff note as the reason.
    if status == ResolvedStatus::Cancelled {
        let reason = snapshot
            .latest_donation()
            .and_then(|d| d.notes.clone());
        return Resolution {
            status,
            source,
            blood_type: None,
            cancellation_reason: reason,
            inconsistencies,
        };
    }

    Resolution {
        status,
        source,
        blood_type: reconcile_blood_type(snapshot),
        cancellation_reason: None,
        inconsistencies,
    }
}

/// Priority 1: terminal and inventory signals on the blood bank unit.
///
/// `disposed_at` and `handed_over_at` outrank the unit's status field;
/// `buffer` is an inventory convention meaning the unit left the bank, so
/// it resolves as `Used`.
fn bank_unit_rule(snapshot: &DonorSnapshot) -> Option<ResolvedStatus> {
    let unit = snapshot.bank_unit.as_ref()?;
    if unit.disposed_at.is_some() {
        return Some(ResolvedStatus::Expired);
    }
    if unit.handed_over_at.is_some() {
        return Some(ResolvedStatus::Used);
    }
    match unit.status {
        BloodBankUnitStatus::Used
        | BloodBankUnitStatus::Transfused
        | BloodBankUnitStatus::Buffer => Some(ResolvedStatus::Used),
        BloodBankUnitStatus::Stored => Some(ResolvedStatus::Stored),
        BloodBankUnitStatus::Allocated => Some(ResolvedStatus::Allocated),
        BloodBankUnitStatus::Processed
        | BloodBankUnitStatus::Valid
        | BloodBankUnitStatus::Unknown => None,
    }
}

/// Priority 2: the clinical eligibility record.
///
/// A blood collection id means phlebotomy happened; clearance (or a
/// successful collection flag) on top of that means processing finished.
fn eligibility_rule(snapshot: &DonorSnapshot) -> Option<ResolvedStatus> {
    let record = snapshot.eligibility.as_ref()?;
    if record.blood_collection_id.is_none() {
        return None;
    }
    if record.decision.is_cleared() || record.collection_successful {
        Some(ResolvedStatus::Processed)
    } else {
        Some(ResolvedStatus::Testing)
    }
}

/// Priority 3: the cached opinion on the donation record itself.
fn cached_status_rule(snapshot: &DonorSnapshot) -> Option<ResolvedStatus> {
    snapshot.latest_donation()?.current_status
}

/// Priority 4: the latest normalized audit-log entry.
fn history_fallback_rule(snapshot: &DonorSnapshot) -> Option<ResolvedStatus> {
    snapshot.latest_history_status()
}

/// Blood typing completes asynchronously from the main pipeline, so the
/// type is taken from the first source that has it: eligibility record,
/// then the latest donation, then any prior donation.
fn reconcile_blood_type(snapshot: &DonorSnapshot) -> Option<BloodType> {
    if let Some(bt) = snapshot.eligibility.as_ref().and_then(|e| e.blood_type) {
        return Some(bt);
    }
    snapshot.donations.iter().find_map(|d| d.blood_type)
}
