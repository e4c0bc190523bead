//! Stage mapper - static metadata for the two donation pipelines.
//!
//! Two overlapping pipelines are tracked: a 6-stage processing pipeline for
//! early-cycle detail views, and a 4-stage blood-bank lifecycle pipeline for
//! post-processing tracking. Both are static decision tables; mapping a
//! resolved status to a stage index never fails, unrecognized positions
//! default to the first stage.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::status::ResolvedStatus;

/// Which pipeline a stage belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Processing,
    Lifecycle,
}

/// Display metadata for one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub progress_percent: u8,
    pub pipeline: Pipeline,
}

/// Position of a stage relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Completed,
    Current,
    Pending,
}

/// A stage annotated with its completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub stage: StageInfo,
    pub state: StageState,
}

static PROCESSING_STAGES: Lazy<[StageInfo; 6]> = Lazy::new(|| {
    [
        StageInfo {
            label: "Registered",
            icon: "clipboard",
            description: "Donation registered and medical history opened",
            progress_percent: 10,
            pipeline: Pipeline::Processing,
        },
        StageInfo {
            label: "Sample Collected",
            icon: "droplet",
            description: "Blood sample drawn for screening",
            progress_percent: 25,
            pipeline: Pipeline::Processing,
        },
        StageInfo {
            label: "Testing",
            icon: "flask",
            description: "Laboratory screening in progress",
            progress_percent: 60,
            pipeline: Pipeline::Processing,
        },
        StageInfo {
            label: "Testing Complete",
            icon: "check-circle",
            description: "Screening finished, awaiting processing",
            progress_percent: 80,
            pipeline: Pipeline::Processing,
        },
        StageInfo {
            label: "Processed",
            icon: "package",
            description: "Unit separated and prepared for storage",
            progress_percent: 90,
            pipeline: Pipeline::Processing,
        },
        StageInfo {
            label: "Ready for Use",
            icon: "heart",
            description: "Unit cleared for hospital use",
            progress_percent: 100,
            pipeline: Pipeline::Processing,
        },
    ]
});

static LIFECYCLE_STAGES: Lazy<[StageInfo; 4]> = Lazy::new(|| {
    [
        StageInfo {
            label: "Processed",
            icon: "package",
            description: "Unit processed and awaiting storage",
            progress_percent: 25,
            pipeline: Pipeline::Lifecycle,
        },
        StageInfo {
            label: "Stored",
            icon: "archive",
            description: "Unit stored in the blood bank",
            progress_percent: 50,
            pipeline: Pipeline::Lifecycle,
        },
        StageInfo {
            label: "Allocated",
            icon: "send",
            description: "Unit allocated to a hospital request",
            progress_percent: 75,
            pipeline: Pipeline::Lifecycle,
        },
        StageInfo {
            label: "Used",
            icon: "heart",
            description: "Unit transfused or handed over",
            progress_percent: 100,
            pipeline: Pipeline::Lifecycle,
        },
    ]
});

/// The 6-stage processing pipeline, in order.
pub fn processing_stages() -> &'static [StageInfo] {
    &*PROCESSING_STAGES
}

/// The 4-stage blood-bank lifecycle pipeline, in order.
pub fn lifecycle_stages() -> &'static [StageInfo] {
    &*LIFECYCLE_STAGES
}

/// Maps a resolved status onto the processing pipeline.
///
/// Post-processing statuses count as the final processing stage; a
/// cancelled or unrecognized position defaults to the first.
pub fn processing_stage_index(status: ResolvedStatus) -> usize {
    match status {
        ResolvedStatus::Registered => 0,
        ResolvedStatus::SampleCollected => 1,
        ResolvedStatus::Testing => 2,
        ResolvedStatus::TestingComplete => 3,
        ResolvedStatus::Processed => 4,
        ResolvedStatus::ReadyForUse
        | ResolvedStatus::Stored
        | ResolvedStatus::Allocated
        | ResolvedStatus::Used
        | ResolvedStatus::Expired => 5,
        ResolvedStatus::Cancelled => 0,
    }
}

/// Maps a resolved status onto the blood-bank lifecycle pipeline.
///
/// "Ready for Use" is treated as already allocated, an inherited quirk of
/// the inventory tooling. Everything pre-storage sits at index 0.
pub fn lifecycle_stage_index(status: ResolvedStatus) -> usize {
    match status {
        ResolvedStatus::Used | ResolvedStatus::Expired => 3,
        ResolvedStatus::Allocated | ResolvedStatus::ReadyForUse => 2,
        ResolvedStatus::Stored => 1,
        _ => 0,
    }
}

/// Annotates a pipeline's stages with completed/current/pending states for
/// a given current index.
pub fn stage_states(stages: &'static [StageInfo], current: usize) -> Vec<StageProgress> {
    stages
        .iter()
        .enumerate()
        .map(|(i, stage)| StageProgress {
            stage: stage.clone(),
            state: if i < current {
                StageState::Completed
            } else if i == current {
                StageState::Current
            } else {
                StageState::Pending
            },
        })
        .collect()
}
