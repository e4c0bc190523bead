//! Tracker view builder - composes resolution, stages and eligibility into
//! one immutable view object for donor and staff consumption.
//!
//! Pure composition; no independent decisions beyond display-value
//! fallbacks. Upstream failures never reach this module, the application
//! layer surfaces them as typed errors instead of a partial view.

use crate::domain::foundation::{DonationId, DonorId, Timestamp};

use super::eligibility::Eligibility;
use super::records::DonorSnapshot;
use super::resolver::Resolution;
use super::stage::{
    lifecycle_stage_index, lifecycle_stages, processing_stage_index, processing_stages,
    stage_states, StageProgress,
};
use super::status::{BloodType, ResolvedStatus};

/// Tracker state of the donor's current donation cycle.
#[derive(Debug, Clone)]
pub struct CycleView {
    pub donation_id: DonationId,
    pub status: ResolvedStatus,
    pub processing_steps: Vec<StageProgress>,
    pub lifecycle_steps: Vec<StageProgress>,
    pub blood_type: Option<BloodType>,
    /// Units collected this cycle. Exactly one unit is physiologically
    /// extracted per cycle, hence the default of 1.
    pub units: u32,
    pub cancellation_reason: Option<String>,
}

/// The composed tracker response for one donor.
#[derive(Debug, Clone)]
pub struct TrackerView {
    pub donor_id: DonorId,
    /// `None` means no donation history for this donor.
    pub cycle: Option<CycleView>,
    pub eligibility: Eligibility,
    /// True once UIs should offer a fresh "start donation" affordance
    /// instead of the previous cycle's tracker.
    pub prompt_new_donation: bool,
}

/// Builds the tracker view from the resolved pieces.
pub fn build(
    snapshot: &DonorSnapshot,
    resolution: &Resolution,
    eligibility: Eligibility,
    now: Timestamp,
) -> TrackerView {
    let cycle = snapshot.latest_donation().map(|donation| CycleView {
        donation_id: donation.donation_id,
        status: resolution.status,
        processing_steps: stage_states(
            processing_stages(),
            processing_stage_index(resolution.status),
        ),
        lifecycle_steps: stage_states(
            lifecycle_stages(),
            lifecycle_stage_index(resolution.status),
        ),
        blood_type: resolution.blood_type,
        units: unit_count(snapshot),
        cancellation_reason: resolution.cancellation_reason.clone(),
    });

    // Within the grace window the closed cycle's tracker stays the most
    // relevant thing to show; past it, prompt for a new donation.
    let prompt_new_donation = eligibility.can_donate_now
        && eligibility
            .grace_until
            .map_or(true, |grace| now.is_after(&grace));

    TrackerView {
        donor_id: snapshot.donor_id.clone(),
        cycle,
        eligibility,
        prompt_new_donation,
    }
}

/// Display unit count: collection record, then inventory record, then 1.
fn unit_count(snapshot: &DonorSnapshot) -> u32 {
    snapshot
        .collection
        .as_ref()
        .map(|c| c.amount_taken)
        .or_else(|| snapshot.bank_unit.as_ref().map(|u| u.units))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::eligibility::{compute, EligibilityState};
    use crate::domain::donation::records::{BloodBankUnit, BloodCollectionRecord, Donation};
    use crate::domain::donation::resolver::resolve;
    use crate::domain::donation::stage::StageState;
    use crate::domain::donation::status::BloodBankUnitStatus;
    use crate::domain::foundation::{CollectionId, UnitId};

    fn donor() -> DonorId {
        DonorId::new("donor-1").unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn donation(date: &str, status: Option<ResolvedStatus>) -> Donation {
        Donation {
            donation_id: DonationId::new(),
            donor_id: donor(),
            current_status: status,
            donation_date: ts(date),
            blood_type: None,
            units_collected: 1,
            medical_history_completed: true,
            physical_examination_completed: true,
            screening_completed: true,
            blood_collection_completed: true,
            notes: None,
            last_updated: ts(date),
        }
    }

    fn build_view(snapshot: &DonorSnapshot, now: Timestamp) -> TrackerView {
        let resolution = resolve(snapshot);
        let eligibility = compute(snapshot, resolution.status, now);
        build(snapshot, &resolution, eligibility, now)
    }

    #[test]
    fn no_history_yields_no_cycle_and_prompts() {
        let snapshot = DonorSnapshot::empty(donor());
        let view = build_view(&snapshot, ts("2024-03-15T00:00:00Z"));

        assert!(view.cycle.is_none());
        assert!(view.prompt_new_donation);
        assert!(view.eligibility.can_donate_now);
    }

    #[test]
    fn closed_cycle_within_grace_still_shows_tracker() {
        // Completed 2024-01-01: cooldown end 2024-04-01, grace 2024-04-08.
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation("2024-01-01T00:00:00Z", Some(ResolvedStatus::Used))];

        let view = build_view(&snapshot, ts("2024-04-07T00:00:00Z"));
        assert!(view.eligibility.can_donate_now);
        assert!(!view.prompt_new_donation);
        assert!(view.cycle.is_some());
    }

    #[test]
    fn past_grace_prompts_new_donation() {
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation("2024-01-01T00:00:00Z", Some(ResolvedStatus::Used))];

        let view = build_view(&snapshot, ts("2024-04-09T00:00:00Z"));
        assert!(view.prompt_new_donation);
    }

    #[test]
    fn cooldown_never_prompts() {
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation("2024-01-01T00:00:00Z", Some(ResolvedStatus::Used))];

        let view = build_view(&snapshot, ts("2024-03-15T00:00:00Z"));
        assert!(!view.prompt_new_donation);
        assert_eq!(view.eligibility.state, EligibilityState::Cooldown);
    }

    #[test]
    fn cycle_carries_both_pipelines() {
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation(
            "2024-02-01T00:00:00Z",
            Some(ResolvedStatus::Testing),
        )];

        let view = build_view(&snapshot, ts("2024-02-15T00:00:00Z"));
        let cycle = view.cycle.unwrap();
        assert_eq!(cycle.processing_steps.len(), 6);
        assert_eq!(cycle.lifecycle_steps.len(), 4);
        assert_eq!(cycle.processing_steps[2].state, StageState::Current);
        assert_eq!(cycle.lifecycle_steps[0].state, StageState::Current);
    }

    #[test]
    fn unit_count_prefers_collection_record() {
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation(
            "2024-02-01T00:00:00Z",
            Some(ResolvedStatus::Stored),
        )];
        snapshot.collection = Some(BloodCollectionRecord {
            collection_id: CollectionId::new(),
            donor_id: donor(),
            amount_taken: 2,
            start_time: ts("2024-02-01T00:00:00Z"),
        });
        snapshot.bank_unit = Some(BloodBankUnit {
            unit_id: UnitId::new(),
            donor_id: donor(),
            status: BloodBankUnitStatus::Stored,
            handed_over_at: None,
            disposed_at: None,
            hospital_from: None,
            units: 5,
            created_at: ts("2024-02-02T00:00:00Z"),
        });

        let view = build_view(&snapshot, ts("2024-02-15T00:00:00Z"));
        assert_eq!(view.cycle.unwrap().units, 2);
    }

    #[test]
    fn unit_count_falls_back_to_bank_unit_then_one() {
        let mut snapshot = DonorSnapshot::empty(donor());
        snapshot.donations = vec![donation(
            "2024-02-01T00:00:00Z",
            Some(ResolvedStatus::Stored),
        )];
        snapshot.bank_unit = Some(BloodBankUnit {
            unit_id: UnitId::new(),
            donor_id: donor(),
            status: BloodBankUnitStatus::Stored,
            handed_over_at: None,
            disposed_at: None,
            hospital_from: None,
            units: 3,
            created_at: ts("2024-02-02T00:00:00Z"),
        });

        let view = build_view(&snapshot, ts("2024-02-15T00:00:00Z"));
        assert_eq!(view.cycle.unwrap().units, 3);

        let mut bare = DonorSnapshot::empty(donor());
        bare.donations = vec![donation(
            "2024-02-01T00:00:00Z",
            Some(ResolvedStatus::Testing),
        )];
        let view = build_view(&bare, ts("2024-02-15T00:00:00Z"));
        assert_eq!(view.cycle.unwrap().units, 1);
    }

    #[test]
    fn cancelled_cycle_surfaces_reason() {
        let mut snapshot = DonorSnapshot::empty(donor());
        let mut d = donation("2024-02-01T00:00:00Z", Some(ResolvedStatus::Cancelled));
        d.notes = Some("Low hemoglobin".to_string());
        snapshot.donations = vec![d];

        let view = build_view(&snapshot, ts("2024-02-15T00:00:00Z"));
        let cycle = view.cycle.unwrap();
        assert_eq!(cycle.status, ResolvedStatus::Cancelled);
        assert_eq!(cycle.cancellation_reason.as_deref(), Some("Low hemoglobin"));
    }
}
