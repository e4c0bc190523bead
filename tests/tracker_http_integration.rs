//! Integration tests for the tracker HTTP endpoints.
//!
//! These tests drive the full stack below the network: router, handlers,
//! application layer, resolver and the in-memory store, asserting on the
//! JSON the donor-facing clients actually see.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use hemotrack::adapters::http::{tracker_routes, TrackerAppState};
use hemotrack::adapters::memory::InMemoryDonorStore;
use hemotrack::domain::donation::{
    BloodBankUnit, BloodBankUnitStatus, BloodCollectionRecord, Donation, ResolvedStatus,
};
use hemotrack::domain::foundation::{CollectionId, DonationId, DonorId, Timestamp, UnitId};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

fn donor(id: &str) -> DonorId {
    DonorId::new(id).unwrap()
}

fn donation(donor_id: &str, status: Option<ResolvedStatus>) -> Donation {
    Donation {
        donation_id: DonationId::new(),
        donor_id: donor(donor_id),
        current_status: status,
        donation_date: ts("2024-01-01T00:00:00Z"),
        blood_type: None,
        units_collected: 1,
        medical_history_completed: true,
        physical_examination_completed: true,
        screening_completed: true,
        blood_collection_completed: true,
        notes: None,
        last_updated: ts("2024-01-02T00:00:00Z"),
    }
}

fn stored_unit(donor_id: &str) -> BloodBankUnit {
    BloodBankUnit {
        unit_id: UnitId::new(),
        donor_id: donor(donor_id),
        status: BloodBankUnitStatus::Stored,
        handed_over_at: None,
        disposed_at: None,
        hospital_from: None,
        units: 1,
        created_at: ts("2024-01-05T00:00:00Z"),
    }
}

fn app(store: Arc<InMemoryDonorStore>) -> axum::Router {
    tracker_routes(TrackerAppState::new(store.clone(), store))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// =============================================================================
// GET /api/tracker/:donor_id
// =============================================================================

#[tokio::test]
async fn tracker_resolves_bank_unit_over_cached_status() {
    let store = Arc::new(InMemoryDonorStore::new());
    let d = donation("donor-1", Some(ResolvedStatus::Testing));
    let donation_id = d.donation_id;
    store.insert_donation(d);
    store.insert_bank_unit(stored_unit("donor-1"));
    store.insert_collection(BloodCollectionRecord {
        collection_id: CollectionId::new(),
        donor_id: donor("donor-1"),
        amount_taken: 2,
        start_time: ts("2024-01-01T09:00:00Z"),
    });

    let (status, body) = get_json(app(store.clone()), "/api/tracker/donor-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor_id"], "donor-1");
    assert_eq!(body["cycle"]["status"], "Stored");
    assert_eq!(body["cycle"]["units"], 2);
    assert_eq!(body["cycle"]["processing_steps"].as_array().unwrap().len(), 6);
    assert_eq!(body["cycle"]["lifecycle_steps"].as_array().unwrap().len(), 4);

    // The view read refreshed the drifted cache as a side effect.
    assert_eq!(
        store.cached_status(&donation_id),
        Some(ResolvedStatus::Stored)
    );
}

#[tokio::test]
async fn tracker_for_unknown_donor_returns_empty_view() {
    let (status, body) = get_json(
        app(Arc::new(InMemoryDonorStore::new())),
        "/api/tracker/donor-9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["cycle"].is_null());
    assert_eq!(body["eligibility"]["can_donate_now"], true);
    assert_eq!(body["eligibility"]["state"], "eligible_now");
    assert_eq!(body["prompt_new_donation"], true);
}

#[tokio::test]
async fn tracker_surfaces_cooldown_window() {
    let store = Arc::new(InMemoryDonorStore::new());
    store.insert_donation(donation("donor-1", Some(ResolvedStatus::Used)));

    let (status, body) = get_json(app(store), "/api/tracker/donor-1").await;

    assert_eq!(status, StatusCode::OK);
    // Donated 2024-01-01: three calendar months later.
    assert!(body["eligibility"]["next_donation_date"]
        .as_str()
        .unwrap()
        .starts_with("2024-04-01"));
    assert!(body["eligibility"]["grace_until"]
        .as_str()
        .unwrap()
        .starts_with("2024-04-08"));
    assert!(body["eligibility"]["last_completed_donation_date"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01"));
}

#[tokio::test]
async fn tracker_shows_cancellation_reason() {
    let store = Arc::new(InMemoryDonorStore::new());
    let mut d = donation("donor-1", Some(ResolvedStatus::Cancelled));
    d.notes = Some("Low hemoglobin".to_string());
    store.insert_donation(d);

    let (status, body) = get_json(app(store), "/api/tracker/donor-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["status"], "Cancelled");
    assert_eq!(body["cycle"]["cancellation_reason"], "Low hemoglobin");
}

#[tokio::test]
async fn tracker_maps_source_failure_to_503() {
    let store = Arc::new(InMemoryDonorStore::new());
    store.insert_donation(donation("donor-1", Some(ResolvedStatus::Testing)));
    store.fail_bank_unit_fetches();

    let (status, body) = get_json(app(store), "/api/tracker/donor-1").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SOURCE_UNAVAILABLE");
}

// =============================================================================
// POST /api/recompute
// =============================================================================

#[tokio::test]
async fn recompute_single_donor_reports_update() {
    let store = Arc::new(InMemoryDonorStore::new());
    let d = donation("donor-1", Some(ResolvedStatus::Testing));
    let donation_id = d.donation_id;
    store.insert_donation(d);
    store.insert_bank_unit(stored_unit("donor-1"));

    let (status, body) = post_json(
        app(store.clone()),
        "/api/recompute",
        r#"{"scope": {"donor": "donor-1"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"].as_array().unwrap().len(), 1);
    assert_eq!(body["updated"][0], "donor-1");
    assert_eq!(
        store.cached_status(&donation_id),
        Some(ResolvedStatus::Stored)
    );
}

#[tokio::test]
async fn recompute_all_is_idempotent_across_runs() {
    let store = Arc::new(InMemoryDonorStore::new());
    store.insert_donation(donation("donor-1", Some(ResolvedStatus::Testing)));
    store.insert_bank_unit(stored_unit("donor-1"));
    store.insert_donation(donation("donor-2", Some(ResolvedStatus::Registered)));

    let (status, body) = post_json(app(store.clone()), "/api/recompute", r#"{"scope": "all"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"].as_array().unwrap().len(), 1);
    assert_eq!(body["unchanged"].as_array().unwrap().len(), 1);

    let (status, body) = post_json(app(store.clone()), "/api/recompute", r#"{"scope": "all"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["updated"].as_array().unwrap().is_empty());
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn recompute_reports_per_donor_failures() {
    let store = Arc::new(InMemoryDonorStore::new());
    store.insert_donation(donation("donor-1", Some(ResolvedStatus::Testing)));
    store.insert_donation(donation("donor-2", Some(ResolvedStatus::Testing)));
    store.insert_bank_unit(stored_unit("donor-2"));
    store.fail_bank_unit_fetches_for("donor-1");

    let (status, body) = post_json(app(store), "/api/recompute", r#"{"scope": "all"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["donor_id"], "donor-1");
    assert_eq!(body["errors"][0]["retryable"], true);
    assert_eq!(body["updated"].as_array().unwrap().len(), 1);
}
