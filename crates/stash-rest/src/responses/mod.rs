//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stash_core::{ErrorResponse, StashError};

/// JSON envelope for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub error: ErrorResponse,
}

impl ApiResponse {
    /// Creates an error response.
    #[must_use]
    pub const fn error(error: ErrorResponse) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub StashError);

impl From<StashError> for AppError {
    fn from(err: StashError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_response = ErrorResponse::from_error(&self.0);
        let body = Json(ApiResponse::error(error_response));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let error = ErrorResponse::from_error(&StashError::validation("bad"));
        let json = serde_json::to_value(ApiResponse::error(error)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["error"]["message"].as_str().unwrap().contains("bad"));
    }

    #[test]
    fn test_timeout_maps_to_service_unavailable() {
        let response = AppError(StashError::Timeout("slow".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_cache_failure_maps_to_internal_error() {
        let response = AppError(StashError::cache("down")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
