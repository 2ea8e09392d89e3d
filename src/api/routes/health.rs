use axum::{extract::State, Json};
use crate::api::models::{timestamp, HealthResponse};
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "garak-api-service",
        timestamp: timestamp(),
        version: env!("CARGO_PKG_VERSION"),
        build: option_env!("GIT_HASH"),
        built_at: option_env!("GATEWAY_BUILT_AT"),
        active_scans: state.active_scans.len(),
    })
}
