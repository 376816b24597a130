use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;

use crate::core::StatsError;

use super::types::ErrorResponse;

pub struct ApiError(pub StatsError);

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        warn!("request failed with {}: {}", status, self.0);

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
