use axum::{http::StatusCode, response::IntoResponse, Json};
use crate::errors::GatewayError;
use super::models::{ErrorResponse, ValidationErrorResponse};

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        match self {
            GatewayError::Validation(details) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrorResponse::new(details))).into_response()
            }
            other => {
                let body = ErrorResponse { success: false, error: other.to_string() };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
