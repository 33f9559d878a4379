// ============================
// airavat-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `AIRAVAT_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "AIRAVAT";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
///
/// Sections and keys left out of every source fall back to [`Default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which credential store backs the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    FlatFile,
}

/// Credential store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data directory for the flat-file store
    pub path: PathBuf,
}

/// What the access guard accepts as session evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidencePolicy {
    /// Any non-empty cookie or `Authorization` value passes.
    Presence,
    /// The value must name a live admin session.
    Session,
}

/// Access control and account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Path prefix of the admin area
    pub protected_prefix: String,
    /// Login page inside the admin area; always reachable without a session
    pub login_path: String,
    /// Cookie carrying the admin session token
    pub session_cookie: String,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub secure_cookie: bool,
    pub evidence_policy: EvidencePolicy,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    pub min_password_length: usize,
    /// scrypt `log_n` cost parameter
    pub password_hash_log_n: u8,
    /// Accounts created with one of these emails may enter the admin area
    ///
    /// The defaults layer drops an empty list, so this needs its own default.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            storage: StorageSettings {
                backend: StorageBackend::FlatFile,
                path: PathBuf::from("data"),
            },
            auth: AuthSettings::default(),
            log: LogSettings {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            login_path: "/admin/login".to_string(),
            session_cookie: "adminSession".to_string(),
            secure_cookie: true,
            evidence_policy: EvidencePolicy::Session,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            min_password_length: 6,
            password_hash_log_n: 15,
            admin_emails: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from the given file (if present) and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_emails")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Reject settings that would leave the admin area misconfigured
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }

        let auth = &self.auth;
        if !auth.protected_prefix.starts_with('/') || auth.protected_prefix.len() < 2 {
            bail!("auth.protected_prefix must be an absolute path below /");
        }
        if !auth.login_path.starts_with('/') {
            bail!("auth.login_path must be an absolute path");
        }
        let prefix = auth.protected_prefix.trim_end_matches('/');
        let login = auth.login_path.trim_end_matches('/');
        match login.strip_prefix(prefix) {
            Some(rest) if rest.starts_with('/') && rest.len() > 1 => {}
            _ => bail!("auth.login_path must be a sub-path of auth.protected_prefix"),
        }
        if auth.session_cookie.trim().is_empty() {
            bail!("auth.session_cookie must not be empty");
        }
        if auth.session_ttl_secs == 0 {
            bail!("auth.session_ttl_secs must be positive");
        }
        if auth.min_password_length < 6 {
            bail!("auth.min_password_length must be at least 6");
        }
        if !(10..=20).contains(&auth.password_hash_log_n) {
            bail!("auth.password_hash_log_n must be between 10 and 20");
        }

        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            bail!("log.level must be one of {LOG_LEVELS:?}");
        }
        if self.log.format != "pretty" && self.log.format != "json" {
            bail!("log.format must be `pretty` or `json`");
        }
        Ok(())
    }

    /// Whether an account with this email is granted the admin flag
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.auth
            .admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email))
    }

    /// Settings for tests: in-memory store, cheapest hash cost, plain-HTTP cookie
    pub fn for_tests() -> Self {
        let mut settings = Self::default();
        settings.storage.backend = StorageBackend::Memory;
        settings.auth.password_hash_log_n = 10;
        settings.auth.secure_cookie = false;
        settings
    }
}
