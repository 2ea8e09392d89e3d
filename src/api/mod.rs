pub mod routes;
pub mod models;
pub mod errors;
pub mod validation;

use std::sync::Arc;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::Router;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use crate::config::ResolvedConfig;
use crate::errors::GatewayError;
use crate::models::{ScanId, ScanReport, ScanRequest};
use crate::scan::{ScanExecutor, ScanOrchestrator};

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// A scan currently being orchestrated.
#[derive(Debug, Clone)]
pub struct ActiveScan {
    pub name: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<dyn ScanExecutor>,
    pub active_scans: Arc<DashMap<ScanId, ActiveScan>>,
}

impl AppState {
    pub fn new(scanner: Arc<dyn ScanExecutor>) -> Self {
        Self {
            scanner,
            active_scans: Arc::new(DashMap::new()),
        }
    }

    /// Run a scan on its own task so a dropped connection cannot abandon it
    /// before cleanup.
    pub async fn run_scan(&self, scan_id: ScanId, request: ScanRequest) -> Result<ScanReport, GatewayError> {
        let scanner = Arc::clone(&self.scanner);
        let active = Arc::clone(&self.active_scans);
        active.insert(scan_id, ActiveScan { name: request.name.clone(), started_at: Utc::now() });

        let handle = tokio::spawn(async move {
            let outcome = scanner.run_scan(&scan_id, &request).await;
            active.remove(&scan_id);
            outcome
        });

        handle.await.unwrap_or_else(|e| {
            self.active_scans.remove(&scan_id);
            Err(GatewayError::Internal(format!("Scan task failed: {}", e)))
        })
    }
}

pub async fn create_app_state(config: &ResolvedConfig) -> Result<AppState, GatewayError> {
    let orchestrator = ScanOrchestrator::from_config(config).await?;
    Ok(AppState::new(Arc::new(orchestrator)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/scan", axum::routing::post(routes::scan::create_scan))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
        .with_state(state)
}
