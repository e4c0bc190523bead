//! HTTP DTOs for the tracker endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent
//! evolution. Timestamps cross the wire as RFC 3339 strings; statuses as
//! their display labels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::{RecomputeFailure, RecomputeSummary};
use crate::domain::donation::{
    CycleView, Eligibility, EligibilityState, StageProgress, TrackerView,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Recompute scope: `"all"` or `{"donor": "<donor id>"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeScopeDto {
    All,
    Donor(String),
}

/// Request to recompute cached statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RecomputeRequest {
    pub scope: RecomputeScopeDto,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One annotated pipeline stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageResponse {
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub progress_percent: u8,
    pub state: &'static str,
}

impl From<StageProgress> for StageResponse {
    fn from(progress: StageProgress) -> Self {
        Self {
            label: progress.stage.label,
            icon: progress.stage.icon,
            description: progress.stage.description,
            progress_percent: progress.stage.progress_percent,
            state: match progress.state {
                crate::domain::donation::StageState::Completed => "completed",
                crate::domain::donation::StageState::Current => "current",
                crate::domain::donation::StageState::Pending => "pending",
            },
        }
    }
}

/// The donor's current donation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleResponse {
    pub donation_id: String,
    pub status: &'static str,
    pub processing_steps: Vec<StageResponse>,
    pub lifecycle_steps: Vec<StageResponse>,
    pub blood_type: Option<&'static str>,
    pub units: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl From<CycleView> for CycleResponse {
    fn from(cycle: CycleView) -> Self {
        Self {
            donation_id: cycle.donation_id.to_string(),
            status: cycle.status.label(),
            processing_steps: cycle.processing_steps.into_iter().map(Into::into).collect(),
            lifecycle_steps: cycle.lifecycle_steps.into_iter().map(Into::into).collect(),
            blood_type: cycle.blood_type.map(|bt| bt.label()),
            units: cycle.units,
            cancellation_reason: cycle.cancellation_reason,
        }
    }
}

/// Re-donation eligibility for UI display.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResponse {
    pub can_donate_now: bool,
    pub state: EligibilityState,
    pub next_donation_date: Option<String>,
    pub remaining_months: u32,
    pub remaining_days: u32,
    pub last_completed_donation_date: Option<String>,
    pub grace_until: Option<String>,
}

impl From<Eligibility> for EligibilityResponse {
    fn from(eligibility: Eligibility) -> Self {
        Self {
            can_donate_now: eligibility.can_donate_now,
            state: eligibility.state,
            next_donation_date: eligibility.next_donation_date.map(|t| t.to_rfc3339()),
            remaining_months: eligibility.remaining_months,
            remaining_days: eligibility.remaining_days,
            last_completed_donation_date: eligibility
                .latest_completed_donation
                .map(|d| d.donation_date.to_rfc3339()),
            grace_until: eligibility.grace_until.map(|t| t.to_rfc3339()),
        }
    }
}

/// The composed tracker view for one donor.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerResponse {
    pub donor_id: String,
    pub cycle: Option<CycleResponse>,
    pub eligibility: EligibilityResponse,
    pub prompt_new_donation: bool,
}

impl From<TrackerView> for TrackerResponse {
    fn from(view: TrackerView) -> Self {
        Self {
            donor_id: view.donor_id.to_string(),
            cycle: view.cycle.map(Into::into),
            eligibility: view.eligibility.into(),
            prompt_new_donation: view.prompt_new_donation,
        }
    }
}

/// Per-donor failure in a recompute sweep.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeFailureResponse {
    pub donor_id: String,
    pub message: String,
    pub retryable: bool,
}

impl From<RecomputeFailure> for RecomputeFailureResponse {
    fn from(failure: RecomputeFailure) -> Self {
        Self {
            donor_id: failure.donor_id.to_string(),
            message: failure.message,
            retryable: failure.retryable,
        }
    }
}

/// Outcome of a recompute run.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeSummaryResponse {
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub errors: Vec<RecomputeFailureResponse>,
}

impl From<RecomputeSummary> for RecomputeSummaryResponse {
    fn from(summary: RecomputeSummary) -> Self {
        Self {
            updated: summary.updated.iter().map(ToString::to_string).collect(),
            unchanged: summary.unchanged.iter().map(ToString::to_string).collect(),
            errors: summary.errors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Standard error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SOURCE_UNAVAILABLE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
