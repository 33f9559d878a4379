// ============================
// airavat-backend-lib/src/storage/mod.rs
// ============================
//! Credential store abstraction with in-memory and flat-file implementations.
mod flat_file;
mod memory;

pub use flat_file::FlatFileCredentialStore;
pub use memory::MemoryCredentialStore;

use airavat_common::UserProfile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::auth::password::dummy_hash;
use crate::auth::verify_password;
use crate::error::AppError;

/// Persisted identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// scrypt PHC string
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Public projection handed back to clients
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// A validated, already hashed account ready to be stored
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewAccount {
    fn into_account(self) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            created_at: Utc::now(),
        }
    }
}

/// Uniqueness key for emails: trimmed, lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Uniqueness key for phone numbers: digits only
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Trait for credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a new account
    ///
    /// The uniqueness check and the insert form one atomic step: two
    /// concurrent calls for the same email or phone create exactly one
    /// account, the other fails with [`AppError::DuplicateAccount`].
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AppError>;

    /// Look up an account by email (normalized)
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError>;

    /// Number of stored accounts
    async fn count(&self) -> Result<usize, AppError>;

    /// Check a login attempt. Unknown emails and wrong passwords both
    /// fail with [`AppError::InvalidCredentials`].
    ///
    /// An unknown email is still checked against a throwaway hash at cost
    /// `log_n`, so the response time does not reveal which emails exist.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        log_n: u8,
    ) -> Result<UserAccount, AppError> {
        let account = self.find_by_email(email).await?;

        let hash = account.as_ref().map(|a| a.password_hash.clone());
        let password = Zeroizing::new(password.to_owned());
        let verified = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
            match hash {
                Some(hash) => Ok(verify_password(&hash, &password)),
                None => {
                    verify_password(&dummy_hash(log_n)?, &password);
                    Ok(false)
                },
            }
        })
        .await??;

        match account {
            Some(account) if verified => Ok(account),
            _ => Err(AppError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_email("  A@X.com "), "a@x.com");
        assert_eq!(normalize_phone("+91 98765-43210"), "919876543210");
    }
}
