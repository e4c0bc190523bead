//! HTTP routes for the tracker endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_tracker, recompute_status, TrackerAppState};

/// Creates the tracker router with all endpoints.
pub fn tracker_routes(state: TrackerAppState) -> Router {
    Router::new()
        .route("/api/tracker/:donor_id", get(get_tracker))
        .route("/api/recompute", post(recompute_status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryDonorStore;

    fn router(store: Arc<InMemoryDonorStore>) -> Router {
        tracker_routes(TrackerAppState::new(store.clone(), store))
    }

    #[tokio::test]
    async fn get_tracker_returns_200_for_unknown_donor() {
        let app = router(Arc::new(InMemoryDonorStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tracker/donor-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_tracker_rejects_blank_donor_id() {
        let app = router(Arc::new(InMemoryDonorStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tracker/%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_tracker_surfaces_source_failure_as_503() {
        let store = Arc::new(InMemoryDonorStore::new());
        store.fail_bank_unit_fetches();
        let app = router(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tracker/donor-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn recompute_accepts_all_scope() {
        let app = router(Arc::new(InMemoryDonorStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recompute")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"scope": "all"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn recompute_rejects_malformed_scope() {
        let app = router(Arc::new(InMemoryDonorStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recompute")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"scope": {"everything": true}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
