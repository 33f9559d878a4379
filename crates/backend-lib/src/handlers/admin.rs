//! Admin-area endpoints.
//!
//! Everything here except the login page sits behind the access guard and
//! receives the caller's session through the [`AdminSession`] and
//! [`CurrentSession`] extractors.
use airavat_common::{AuthResponse, LoginRequest, UserProfile};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::json_body;
use crate::auth::{AdminSession, CurrentSession};
use crate::config::AuthSettings;
use crate::{error::AppError, AppState};

/// `Set-Cookie` value carrying a session token for the admin area
fn session_cookie(auth: &AuthSettings, token: &str, max_age_secs: u64) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax",
        auth.session_cookie,
        token,
        auth.protected_prefix.trim_end_matches('/'),
        max_age_secs,
    );
    if auth.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}

/// `GET <login path>`: describes the login entry point
pub async fn login_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "login": state.settings.auth.login_path,
        "method": "POST",
        "fields": ["email", "password"],
    }))
}

/// `POST <login path>`: admin login
///
/// Returns the token in the body and sets the admin session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let response: AuthResponse = state.issuer.admin_login(request).await?;

    let auth = &state.settings.auth;
    let cookie = session_cookie(auth, &response.token, auth.session_ttl_secs);
    with_cookie(Json(response).into_response(), cookie)
}

/// `GET <prefix>/session`: the signed-in admin's profile
pub async fn session(AdminSession(current): AdminSession) -> Json<UserProfile> {
    let session = current.session;
    Json(UserProfile {
        full_name: session.full_name,
        email: session.email,
        phone: session.phone,
        is_admin: session.is_admin,
    })
}

/// `POST <prefix>/logout`: ends the session and expires the cookie
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
) -> Result<Response, AppError> {
    state.issuer.logout(current.token());
    info!(user_id = %current.session.user_id, "logged out");

    let cookie = session_cookie(&state.settings.auth, "", 0);
    with_cookie(
        Json(json!({ "message": "Logged out successfully" })).into_response(),
        cookie,
    )
}
