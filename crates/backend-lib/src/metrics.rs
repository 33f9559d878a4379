// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const GUARD_PASS: &str = "guard.pass";
pub const GUARD_REDIRECT: &str = "guard.redirect";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const ACCOUNT_CREATED: &str = "account.created";
pub const ACCOUNT_DUPLICATE: &str = "account.duplicate";
pub const LOGIN_FAILED: &str = "login.failed";
pub const APPLICATION_RECEIVED: &str = "application.received";
