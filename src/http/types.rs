use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::store::StoreError;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError { pub message: String }

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

pub fn status_of(err: &AppError) -> StatusCode {
    match err {
        AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        AppError::Store(StoreError::IdMismatch { .. }) => StatusCode::BAD_REQUEST,
        AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Database(_) | AppError::InvalidData(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, axum::Json(ApiError::new(self.to_string()))).into_response()
    }
}
