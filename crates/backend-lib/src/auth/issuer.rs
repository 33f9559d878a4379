//! Turns a signup or a successful login into a session token.
use airavat_common::{AuthResponse, LoginRequest, SignupRequest};
use metrics::counter;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use zeroize::Zeroize;

use super::{hash_password_secure, SessionManager};
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics::{ACCOUNT_CREATED, ACCOUNT_DUPLICATE, LOGIN_FAILED};
use crate::storage::{CredentialStore, NewAccount, UserAccount};
use crate::validation;

/// Issues session tokens for new and returning accounts
#[derive(Clone)]
pub struct SessionIssuer {
    store: Arc<dyn CredentialStore>,
    sessions: SessionManager,
    settings: Arc<Settings>,
}

impl SessionIssuer {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        sessions: SessionManager,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            store,
            sessions,
            settings,
        }
    }

    /// Create an account and open a session for it
    ///
    /// Validation runs first and the store insert is atomic, so any failure
    /// leaves no account and issues no token.
    #[instrument(skip_all)]
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, AppError> {
        validation::validate_signup(&req, self.settings.auth.min_password_length)?;

        let SignupRequest {
            full_name,
            email,
            phone,
            mut password,
            mut confirm_password,
        } = req;
        confirm_password.zeroize();

        let log_n = self.settings.auth.password_hash_log_n;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_secure(&mut password, log_n))
                .await??;

        let is_admin = self.settings.is_admin_email(&email);
        let account = NewAccount {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            password_hash,
            is_admin,
        };

        let account = match self.store.create_account(account).await {
            Ok(account) => account,
            Err(AppError::DuplicateAccount) => {
                counter!(ACCOUNT_DUPLICATE).increment(1);
                info!("signup rejected: account already exists");
                return Err(AppError::DuplicateAccount);
            },
            Err(err) => return Err(err),
        };

        counter!(ACCOUNT_CREATED).increment(1);
        info!(user_id = %account.id, is_admin = account.is_admin, "account created");
        Ok(self.issue(&account))
    }

    /// Verify credentials and open a session
    #[instrument(skip_all)]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let account = self.authenticate(req).await?;
        Ok(self.issue(&account))
    }

    /// Like [`login`](Self::login), but only admin accounts get a session
    #[instrument(skip_all)]
    pub async fn admin_login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let account = self.authenticate(req).await?;
        if !account.is_admin {
            warn!(user_id = %account.id, "non-admin account attempted admin login");
            return Err(AppError::Forbidden);
        }
        Ok(self.issue(&account))
    }

    /// End the session behind `token`
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.revoke(token)
    }

    async fn authenticate(&self, mut req: LoginRequest) -> Result<UserAccount, AppError> {
        validation::validate_login(&req)?;

        let log_n = self.settings.auth.password_hash_log_n;
        let result = self
            .store
            .verify_credentials(&req.email, &req.password, log_n)
            .await;
        req.password.zeroize();

        match result {
            Ok(account) => {
                info!(user_id = %account.id, "login succeeded");
                Ok(account)
            },
            Err(err) => {
                counter!(LOGIN_FAILED).increment(1);
                warn!("login failed");
                Err(err)
            },
        }
    }

    fn issue(&self, account: &UserAccount) -> AuthResponse {
        AuthResponse {
            token: self.sessions.create_session(account),
            user: account.profile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;
    use crate::validation::ValidationError;

    fn issuer() -> (SessionIssuer, Arc<MemoryCredentialStore>, SessionManager) {
        let mut settings = Settings::for_tests();
        settings.auth.admin_emails = vec!["boss@airavat.in".to_string()];
        let store = Arc::new(MemoryCredentialStore::new());
        let sessions = SessionManager::default();
        let issuer = SessionIssuer::new(store.clone(), sessions.clone(), Arc::new(settings));
        (issuer, store, sessions)
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            full_name: "A".to_string(),
            email: email.to_string(),
            phone: "9999999999".to_string(),
            password: "abcdef".to_string(),
            confirm_password: "abcdef".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_issues_token_and_profile() {
        let (issuer, store, sessions) = issuer();
        let resp = issuer.signup(signup("a@x.com")).await.unwrap();

        assert!(!resp.token.is_empty());
        assert_eq!(resp.user.full_name, "A");
        assert_eq!(resp.user.email, "a@x.com");
        assert!(!resp.user.is_admin);
        assert!(sessions.validate_session(&resp.token));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resubmitted_signup_fails() {
        let (issuer, store, sessions) = issuer();
        issuer.signup(signup("a@x.com")).await.unwrap();

        let err = issuer.signup(signup("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateAccount));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_signup_creates_nothing() {
        let (issuer, store, sessions) = issuer();

        let mut req = signup("a@x.com");
        req.confirm_password = "abcdeg".to_string();
        let err = issuer.signup(req).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::PasswordMismatch)
        ));

        let mut req = signup("a@x.com");
        req.password = "abc".to_string();
        req.confirm_password = "abc".to_string();
        let err = issuer.signup(req).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::PasswordTooShort(6))
        ));

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_login_and_admin_login() {
        let (issuer, _store, sessions) = issuer();
        issuer.signup(signup("a@x.com")).await.unwrap();

        let mut boss = signup("boss@airavat.in");
        boss.phone = "8888888888".to_string();
        let boss_resp = issuer.signup(boss).await.unwrap();
        assert!(boss_resp.user.is_admin);

        let login = |email: &str, password: &str| LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = issuer.login(login("a@x.com", "abcdef")).await.unwrap();
        assert!(sessions.validate_session(&resp.token));

        assert!(matches!(
            issuer.login(login("a@x.com", "nope!!")).await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            issuer.admin_login(login("a@x.com", "abcdef")).await,
            Err(AppError::Forbidden)
        ));

        let admin = issuer
            .admin_login(login("BOSS@airavat.in", "abcdef"))
            .await
            .unwrap();
        assert!(sessions.is_admin_session(&admin.token));

        assert!(issuer.logout(&admin.token));
        assert!(!sessions.validate_session(&admin.token));
    }
}
