//! Public signup and login endpoints.
use airavat_common::{AuthResponse, LoginRequest, SignupRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::json_body;
use crate::{error::AppError, AppState};

/// `POST /api/auth/signup`
///
/// Creates the account and returns `201` with the session token and a
/// profile echo.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let request = json_body(payload)?;
    let response = state.issuer.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let request = json_body(payload)?;
    let response = state.issuer.login(request).await?;
    Ok(Json(response))
}
