//! Forge API /v1: REST endpoints over the export engine
//!
//! | Route | |
//! |-------|-|
//! | `POST /v1/export` | gate, check readiness, generate a bundle |
//! | `GET /v1/formats?plan=` | what a plan may export |
//! | `GET /v1/health` | liveness |
//! | `GET /metrics` | Prometheus text |
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use forge_bundle::BundleAssembler;
use forge_core::{ExportConfig, ExportError};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use metrics::ExportMetrics;

/// Shared, read-only service state
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<BundleAssembler>,
    pub metrics: Arc<ExportMetrics>,
}

impl AppState {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        let metrics = ExportMetrics::new().map_err(|e| ExportError::Config(e.to_string()))?;
        Ok(Self {
            assembler: Arc::new(BundleAssembler::new(config)?),
            metrics: Arc::new(metrics),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/export", post(handlers::export))
        .route("/v1/formats", get(handlers::formats))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Forge API listening on {}", addr);
    axum::serve(listener, app).await
}
