// ============================
// airavat-backend-lib/src/lib.rs
// ============================
//! Core functionality for the Airavat site server: the admin-area access
//! guard, account signup and session issuance.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{SessionIssuer, SessionManager};
use crate::config::{Settings, StorageBackend};
use crate::middleware::RouteRules;
use crate::storage::{CredentialStore, FlatFileCredentialStore, MemoryCredentialStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Settings manager
    pub settings: Arc<Settings>,
    /// Protected-area classification used by the access guard
    pub routes: Arc<RouteRules>,
    /// Live sessions
    pub sessions: SessionManager,
    /// Credential store backend
    pub store: Arc<dyn CredentialStore>,
    /// Signup and login
    pub issuer: SessionIssuer,
}

impl AppState {
    /// Create a new application state over the given credential store
    pub fn new(store: Arc<dyn CredentialStore>, settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let routes = Arc::new(RouteRules::from_settings(&settings.auth)?);
        let settings = Arc::new(settings);
        let sessions = SessionManager::new(Duration::from_secs(settings.auth.session_ttl_secs));
        let issuer = SessionIssuer::new(store.clone(), sessions.clone(), settings.clone());

        Ok(Self {
            settings,
            routes,
            sessions,
            store,
            issuer,
        })
    }

    /// Create a new application state with the store named in the settings
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn CredentialStore> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryCredentialStore::new()),
            StorageBackend::FlatFile => {
                Arc::new(FlatFileCredentialStore::new(&settings.storage.path)?)
            },
        };
        Self::new(store, settings)
    }
}
