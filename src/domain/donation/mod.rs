//! Donation domain - status resolution, stage mapping and eligibility.

pub mod eligibility;
pub mod records;
pub mod resolver;
pub mod stage;
pub mod status;
pub mod tracker;

pub use eligibility::{Eligibility, EligibilityState, COOLDOWN_MONTHS, GRACE_DAYS};
pub use records::{
    BloodBankUnit, BloodCollectionRecord, Donation, DonorSnapshot, EligibilityRecord,
    MedicalHistoryRecord, StatusHistoryEntry,
};
pub use resolver::{resolve, Inconsistency, Resolution, ResolutionSource};
pub use stage::{
    lifecycle_stage_index, lifecycle_stages, processing_stage_index, processing_stages,
    stage_states, Pipeline, StageInfo, StageProgress, StageState,
};
pub use status::{BloodBankUnitStatus, BloodType, EligibilityDecision, ResolvedStatus};
pub use tracker::{CycleView, TrackerView};
