//! Eligibility calculator - re-donation cooldown and grace window.
//!
//! The cooldown clock runs from the donor's latest completed donation:
//! three calendar months, decomposed into whole months plus remaining days
//! (not a 30-day approximation). A short grace period after the cooldown
//! keeps the previous cycle's tracker relevant before UIs switch to a
//! "start new donation" prompt.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::records::{Donation, DonorSnapshot};
use super::status::ResolvedStatus;

/// Cooldown between donations, in calendar months.
pub const COOLDOWN_MONTHS: u32 = 3;

/// Grace window after the cooldown ends, in days.
pub const GRACE_DAYS: i64 = 7;

/// Distinguished eligibility situations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityState {
    /// No cooldown constrains the donor.
    EligibleNow,
    /// A completed donation started the cooldown clock.
    Cooldown,
    /// The only donation is still moving through the pipeline; there is no
    /// countdown, the donor waits for completion.
    CurrentlyProcessing,
}

/// Result of the eligibility computation for one donor.
#[derive(Debug, Clone)]
pub struct Eligibility {
    pub can_donate_now: bool,
    pub state: EligibilityState,
    /// End of the cooldown window, when one is running.
    pub next_donation_date: Option<Timestamp>,
    pub remaining_months: u32,
    pub remaining_days: u32,
    pub latest_completed_donation: Option<Donation>,
    /// End of the grace window; past this the prior cycle is fully closed.
    pub grace_until: Option<Timestamp>,
}

impl Eligibility {
    fn unconstrained() -> Self {
        Self {
            can_donate_now: true,
            state: EligibilityState::EligibleNow,
            next_donation_date: None,
            remaining_months: 0,
            remaining_days: 0,
            latest_completed_donation: None,
            grace_until: None,
        }
    }

    fn currently_processing() -> Self {
        Self {
            can_donate_now: false,
            state: EligibilityState::CurrentlyProcessing,
            next_donation_date: None,
            remaining_months: 0,
            remaining_days: 0,
            latest_completed_donation: None,
            grace_until: None,
        }
    }
}

/// Computes re-donation eligibility from a snapshot.
///
/// `resolved` is the authoritative status of the latest donation; prior
/// donations are judged by their cached status, the only signal still
/// available for closed cycles.
pub fn compute(snapshot: &DonorSnapshot, resolved: ResolvedStatus, now: Timestamp) -> Eligibility {
    let completed = latest_completed_donation(snapshot, resolved);

    let Some(donation) = completed else {
        // No completed cycle. A cycle still in processing blocks donation
        // without a countdown; otherwise eligibility is unconstrained.
        let latest_is_processing =
            snapshot.latest_donation().is_some() && resolved.is_active_processing();
        if latest_is_processing {
            return Eligibility::currently_processing();
        }
        return Eligibility::unconstrained();
    };

    let cooldown_end = donation.donation_date.plus_calendar_months(COOLDOWN_MONTHS);
    let grace_until = cooldown_end.plus_days(GRACE_DAYS);
    let (months, days) = now.calendar_span_until(&cooldown_end);
    let can_donate_now = !now.is_before(&cooldown_end);

    Eligibility {
        can_donate_now,
        state: if can_donate_now {
            EligibilityState::EligibleNow
        } else {
            EligibilityState::Cooldown
        },
        next_donation_date: Some(cooldown_end),
        remaining_months: months,
        remaining_days: days,
        latest_completed_donation: Some(donation.clone()),
        grace_until: Some(grace_until),
    }
}

/// Most recent donation whose resolved status closes a cycle.
fn latest_completed_donation<'a>(
    snapshot: &'a DonorSnapshot,
    resolved: ResolvedStatus,
) -> Option<&'a Donation> {
    snapshot.donations.iter().enumerate().find_map(|(i, d)| {
        let status = if i == 0 { Some(resolved) } else { d.current_status };
        match status {
            Some(s) if s.is_completed_cycle() => Some(d),
            _ => None,
        }
    })
}
