//! HTTP handlers for the tracker endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{
    GetTrackerError, GetTrackerHandler, GetTrackerQuery, RecomputeCommand, RecomputeError,
    RecomputeScope, RecomputeStatusHandler,
};
use crate::domain::foundation::DonorId;
use crate::ports::{DonationStatusWriter, DonorRecordReader};

use super::dto::{ErrorResponse, RecomputeRequest, RecomputeScopeDto, RecomputeSummaryResponse, TrackerResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct TrackerAppState {
    get_tracker_handler: Arc<GetTrackerHandler>,
    recompute_handler: Arc<RecomputeStatusHandler>,
}

impl TrackerAppState {
    pub fn new(reader: Arc<dyn DonorRecordReader>, writer: Arc<dyn DonationStatusWriter>) -> Self {
        Self {
            get_tracker_handler: Arc::new(GetTrackerHandler::new(reader.clone(), writer.clone())),
            recompute_handler: Arc::new(RecomputeStatusHandler::new(reader, writer)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/tracker/:donor_id - Tracker view for one donor
pub async fn get_tracker(
    State(state): State<TrackerAppState>,
    Path(donor_id): Path<String>,
) -> Response {
    let donor_id = match DonorId::new(&donor_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    match state
        .get_tracker_handler
        .handle(GetTrackerQuery { donor_id })
        .await
    {
        Ok(view) => {
            let response: TrackerResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_tracker_error(e),
    }
}

/// POST /api/recompute - Recompute cached statuses for one donor or all
pub async fn recompute_status(
    State(state): State<TrackerAppState>,
    Json(req): Json<RecomputeRequest>,
) -> Response {
    let scope = match req.scope {
        RecomputeScopeDto::All => RecomputeScope::All,
        RecomputeScopeDto::Donor(raw) => match DonorId::new(&raw) {
            Ok(id) => RecomputeScope::Donor(id),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(e.to_string())),
                )
                    .into_response()
            }
        },
    };

    match state
        .recompute_handler
        .handle(RecomputeCommand { scope })
        .await
    {
        Ok(summary) => {
            let response: RecomputeSummaryResponse = summary.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_recompute_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_tracker_error(error: GetTrackerError) -> Response {
    match error {
        GetTrackerError::SourceUnavailable(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::source_unavailable(msg)),
        )
            .into_response(),
        GetTrackerError::Infrastructure(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )
            .into_response(),
    }
}

fn handle_recompute_error(error: RecomputeError) -> Response {
    match error {
        RecomputeError::SourceUnavailable(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::source_unavailable(msg)),
        )
            .into_response(),
        RecomputeError::Infrastructure(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )
            .into_response(),
    }
}
