//! In-memory credential store, used for development and tests.
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, normalize_phone, CredentialStore, NewAccount, UserAccount};
use crate::error::AppError;

#[derive(Default)]
struct Accounts {
    by_id: HashMap<Uuid, UserAccount>,
    email_index: HashMap<String, Uuid>,
    phone_index: HashMap<String, Uuid>,
}

/// Credential store holding every account in process memory
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<Accounts>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AppError> {
        let email_key = normalize_email(&account.email);
        let phone_key = normalize_phone(&account.phone);

        // single write lock across check and insert
        let mut accounts = self.accounts.write().await;
        if accounts.email_index.contains_key(&email_key)
            || accounts.phone_index.contains_key(&phone_key)
        {
            return Err(AppError::DuplicateAccount);
        }

        let account = account.into_account();
        accounts.email_index.insert(email_key, account.id);
        accounts.phone_index.insert(phone_key, account.id);
        accounts.by_id.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .email_index
            .get(&normalize_email(email))
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.accounts.read().await.by_id.len())
    }
}
