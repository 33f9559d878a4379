//! Request extractors that hand the caller's session to protected handlers.
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use super::Session;
use crate::error::AppError;
use crate::middleware::SessionEvidence;
use crate::AppState;

/// The live session behind the request's session evidence
///
/// Handlers take this as an argument instead of looking the session up
/// themselves. Rejects with 401 when the evidence is missing or names no live
/// session, whatever the guard's evidence policy let through.
#[derive(Clone)]
pub struct CurrentSession {
    token: String,
    pub session: Session,
}

impl CurrentSession {
    /// The bearer token this session was resolved from
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // the guard stores the evidence it saw; fall back to the raw headers
        // for routes outside the protected prefix
        let evidence = match parts.extensions.get::<SessionEvidence>() {
            Some(evidence) => evidence.clone(),
            None => SessionEvidence::from_headers(&parts.headers, &state.settings.auth.session_cookie)
                .ok_or(AppError::Unauthenticated)?,
        };

        let token = evidence.token();
        let session = state.sessions.get(token).ok_or(AppError::Unauthenticated)?;

        Ok(Self {
            token: token.to_string(),
            session,
        })
    }
}

/// A [`CurrentSession`] that belongs to an admin account
pub struct AdminSession(pub CurrentSession);

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        if !current.session.is_admin {
            return Err(AppError::Forbidden);
        }
        Ok(Self(current))
    }
}
