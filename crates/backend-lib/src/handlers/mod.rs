//! HTTP handlers.

pub mod admin;
pub mod auth;
pub mod careers;
pub mod health;

use axum::{
    extract::{rejection::JsonRejection, Json},
    http::Uri,
};

use crate::error::AppError;

/// Unwrap a JSON body, turning extractor rejections into [`AppError::InvalidInput`]
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
