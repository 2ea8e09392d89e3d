pub mod health;
pub mod scan;

use axum::{http::StatusCode, Json};
use super::models::ErrorResponse;

pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { success: false, error: "Not found".to_string() }),
    )
}
