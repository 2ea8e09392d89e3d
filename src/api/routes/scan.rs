use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use crate::api::models::ScanResponse;
use crate::api::validation::validate_scan_request;
use crate::api::AppState;
use crate::errors::GatewayError;
use crate::models::ScanId;
use tracing::{error, info};

pub async fn create_scan(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ScanResponse>), GatewayError> {
    let Json(body) = payload
        .map_err(|rejection| GatewayError::Validation(vec![rejection.body_text()]))?;
    let request = validate_scan_request(&body)?;

    let scan_id = ScanId::new();
    let name = request.name.clone();
    info!(scan_id = %scan_id, name = %name, uri = %request.uri, "Scan accepted");

    match state.run_scan(scan_id, request).await {
        Ok(report) => Ok((StatusCode::OK, Json(ScanResponse::completed(scan_id, name, report)))),
        Err(e) => {
            error!(scan_id = %scan_id, error = %e, "Scan failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanResponse::failed(scan_id, name, &e)),
            ))
        }
    }
}
