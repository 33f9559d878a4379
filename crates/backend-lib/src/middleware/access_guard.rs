//! Access guard for the admin area.
//!
//! Runs before routing on every request. Public paths and the login page pass
//! untouched; any other path under the protected prefix needs session
//! evidence, or the caller is redirected to the login page.
use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use metrics::counter;
use std::{fmt, sync::Arc};
use tracing::debug;

use super::route_class::RouteClass;
use crate::config::EvidencePolicy;
use crate::metrics::{GUARD_PASS, GUARD_REDIRECT};
use crate::AppState;

const BEARER_PREFIX: &str = "bearer ";

/// Where the session evidence was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    Cookie,
    AuthorizationHeader,
}

/// A client-supplied session token, not yet verified
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionEvidence {
    value: String,
    source: EvidenceSource,
}

impl fmt::Debug for SessionEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEvidence")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

impl SessionEvidence {
    /// Pull evidence from request headers
    ///
    /// The named cookie is checked first, then `Authorization`. Empty values
    /// and headers that are not valid visible ASCII count as absent.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Self> {
        if let Some(value) = cookie_value(headers, cookie_name) {
            return Some(Self {
                value,
                source: EvidenceSource::Cookie,
            });
        }

        let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
            source: EvidenceSource::AuthorizationHeader,
        })
    }

    pub fn source(&self) -> EvidenceSource {
        self.source
    }

    /// The session token, with any `Bearer` scheme stripped
    pub fn token(&self) -> &str {
        if self.source == EvidenceSource::AuthorizationHeader {
            let scheme = self.value.get(..BEARER_PREFIX.len());
            if scheme.is_some_and(|s| s.eq_ignore_ascii_case(BEARER_PREFIX)) {
                return self.value[BEARER_PREFIX.len()..].trim_start();
            }
        }
        &self.value
    }
}

/// First value of the named cookie across all `Cookie` headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))?;

    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Outcome of the guard for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    PassThrough,
    RedirectToLogin,
}

/// Decide a request from its route class and accepted evidence
pub fn decide(class: RouteClass, evidence: Option<&SessionEvidence>) -> GuardDecision {
    match class {
        RouteClass::Public | RouteClass::ProtectedEntry => GuardDecision::PassThrough,
        RouteClass::Protected if evidence.is_some() => GuardDecision::PassThrough,
        RouteClass::Protected => GuardDecision::RedirectToLogin,
    }
}

/// Axum middleware applying [`decide`] to every request
///
/// Under [`EvidencePolicy::Session`] the evidence for a protected path must
/// also name a live admin session; under [`EvidencePolicy::Presence`] any
/// non-empty value is accepted. Accepted evidence is stored in the request
/// extensions for downstream extractors.
pub async fn access_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = &state.settings.auth;
    let class = state.routes.classify(request.uri().path());

    let mut evidence = SessionEvidence::from_headers(request.headers(), &auth.session_cookie);
    if class == RouteClass::Protected && auth.evidence_policy == EvidencePolicy::Session {
        evidence = evidence.filter(|e| state.sessions.is_admin_session(e.token()));
    }

    match decide(class, evidence.as_ref()) {
        GuardDecision::PassThrough => {
            counter!(GUARD_PASS).increment(1);
            if let Some(evidence) = evidence {
                request.extensions_mut().insert(evidence);
            }
            next.run(request).await
        },
        GuardDecision::RedirectToLogin => {
            counter!(GUARD_REDIRECT).increment(1);
            debug!(path = %request.uri().path(), "no session evidence, redirecting to login");
            Redirect::temporary(&auth.login_path).into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cookie_evidence() {
        let map = headers(&[("cookie", "theme=dark; adminSession=abc123; other=1")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.source(), EvidenceSource::Cookie);
        assert_eq!(evidence.token(), "abc123");
    }

    #[test]
    fn test_cookie_checked_before_header() {
        let map = headers(&[
            ("cookie", "adminSession=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.token(), "from-cookie");
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let map = headers(&[
            ("cookie", "adminSession="),
            ("authorization", "Bearer from-header"),
        ]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.source(), EvidenceSource::AuthorizationHeader);
        assert_eq!(evidence.token(), "from-header");
    }

    #[test]
    fn test_cookie_across_multiple_headers() {
        let map = headers(&[("cookie", "a=1"), ("cookie", "adminSession=xyz")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.token(), "xyz");
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let map = headers(&[("cookie", "adminSessionX=abc; xadminSession=def")]);
        assert!(SessionEvidence::from_headers(&map, "adminSession").is_none());
    }

    #[test]
    fn test_raw_authorization_value() {
        let map = headers(&[("authorization", "opaque-token")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.token(), "opaque-token");

        let map = headers(&[("authorization", "bearer lower")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert_eq!(evidence.token(), "lower");
    }

    #[test]
    fn test_absent_evidence() {
        assert!(SessionEvidence::from_headers(&HeaderMap::new(), "adminSession").is_none());
        let map = headers(&[("authorization", "   ")]);
        assert!(SessionEvidence::from_headers(&map, "adminSession").is_none());
    }

    #[test]
    fn test_debug_redacts_value() {
        let map = headers(&[("cookie", "adminSession=secret-token")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession").unwrap();
        assert!(!format!("{evidence:?}").contains("secret-token"));
    }

    #[test]
    fn test_decide() {
        let map = headers(&[("cookie", "adminSession=abc")]);
        let evidence = SessionEvidence::from_headers(&map, "adminSession");

        assert_eq!(
            decide(RouteClass::Protected, None),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(
            decide(RouteClass::Protected, evidence.as_ref()),
            GuardDecision::PassThrough
        );
        assert_eq!(
            decide(RouteClass::ProtectedEntry, None),
            GuardDecision::PassThrough
        );
        assert_eq!(decide(RouteClass::Public, None), GuardDecision::PassThrough);
        assert_eq!(
            decide(RouteClass::Public, evidence.as_ref()),
            GuardDecision::PassThrough
        );
    }
}
