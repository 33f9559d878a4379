// ============================
// airavat-backend-lib/src/router.rs
// ============================
//! HTTP router.
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, admin, auth, careers, health};
use crate::middleware::access_guard;
use crate::AppState;

/// Create the site router
///
/// The access guard wraps every route and the fallback, so unknown paths
/// under the protected prefix are redirected like known ones. The login page
/// answers with and without a trailing slash, matching how the guard
/// classifies it.
pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_settings = &state.settings.auth;
    let prefix = auth_settings.protected_prefix.trim_end_matches('/');
    let login_path = auth_settings.login_path.trim_end_matches('/');

    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/careers/apply", post(careers::apply))
        .route(login_path, get(admin::login_page).post(admin::login))
        .route(
            &format!("{login_path}/"),
            get(admin::login_page).post(admin::login),
        )
        .route(&format!("{prefix}/session"), get(admin::session))
        .route(&format!("{prefix}/logout"), post(admin::logout))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), access_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
