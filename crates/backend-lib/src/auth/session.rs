// ============================
// airavat-backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::token_generator::generate_secure_token;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};
use crate::storage::UserAccount;

/// Session TTL (time to live) used when none is configured
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Session {
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Session manager for handling authentication tokens
///
/// Lookups never block on I/O, so the access guard can consult it on every
/// request.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Create a new session for an account and return its token
    pub fn create_session(&self, account: &UserAccount) -> String {
        let token = generate_secure_token();
        let now = SystemTime::now();
        let session = Session {
            user_id: account.id,
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            is_admin: account.is_admin,
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);

        token
    }

    /// Get a live session by token
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?;
        if session.is_expired_at(SystemTime::now()) {
            return None;
        }
        Some(session.clone())
    }

    /// Validate a session token
    pub fn validate_session(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Whether the token names a live session of an admin account
    pub fn is_admin_session(&self, token: &str) -> bool {
        self.get(token).is_some_and(|s| s.is_admin)
    }

    /// Drop a session (logout). Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).is_some();
        if removed {
            gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
        removed
    }

    /// Remove every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = SystemTime::now();
        let before_count = self.sessions.len();

        self.sessions.retain(|_, session| !session.is_expired_at(now));

        let after_count = self.sessions.len();
        let removed = before_count.saturating_sub(after_count);

        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(after_count as f64);
            tracing::debug!(removed, "purged expired sessions");
        }
        removed
    }

    /// Number of sessions currently held, expired or not
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Spawn a task that periodically removes expired sessions
    pub fn spawn_cleanup(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                manager.purge_expired();
            }
        })
    }
}
