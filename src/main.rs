//! Service entry point: configuration, tracing, wiring and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hemotrack::adapters::datastore::{DatastoreConfig, DatastoreRestAdapter};
use hemotrack::adapters::http::{tracker_routes, TrackerAppState};
use hemotrack::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let datastore = Arc::new(DatastoreRestAdapter::new(
        DatastoreConfig::new(
            &config.datastore.base_url,
            config.datastore.service_key.expose_secret(),
        )
        .with_timeout(Duration::from_secs(config.datastore.timeout_secs))
        .with_max_retries(config.datastore.max_retries)
        .with_retry_base_delay(Duration::from_millis(config.datastore.retry_base_delay_ms)),
    ));

    let state = TrackerAppState::new(datastore.clone(), datastore);

    let cors = cors_layer(&config);
    let app = tracker_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "hemotrack listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
