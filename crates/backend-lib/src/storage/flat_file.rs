//! Flat-file credential store.
//!
//! All accounts live in one JSON document, `accounts/accounts.json` under the
//! data directory. Writes go to a temporary file that is renamed over the
//! document, so readers only ever see a complete file.
use async_trait::async_trait;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::{fs as tokio_fs, sync::Mutex};

use super::{normalize_email, normalize_phone, CredentialStore, NewAccount, UserAccount};
use crate::error::AppError;

const ACCOUNTS_DIR: &str = "accounts";
const ACCOUNTS_FILE: &str = "accounts.json";

/// Flat-file implementation of the [`CredentialStore`] trait
pub struct FlatFileCredentialStore {
    root: PathBuf,
    /// Serializes read-check-write cycles
    write_lock: Mutex<()>,
}

impl FlatFileCredentialStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(ACCOUNTS_DIR))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn accounts_path(&self) -> PathBuf {
        self.root.join(ACCOUNTS_DIR).join(ACCOUNTS_FILE)
    }

    async fn load(&self) -> Result<Vec<UserAccount>, AppError> {
        let path = self.accounts_path();
        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, accounts: &[UserAccount]) -> Result<(), AppError> {
        let path = self.accounts_path();
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(accounts)?;
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlatFileCredentialStore {
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AppError> {
        let email_key = normalize_email(&account.email);
        let phone_key = normalize_phone(&account.phone);

        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load().await?;

        let duplicate = accounts.iter().any(|existing| {
            normalize_email(&existing.email) == email_key
                || normalize_phone(&existing.phone) == phone_key
        });
        if duplicate {
            return Err(AppError::DuplicateAccount);
        }

        let account = account.into_account();
        accounts.push(account.clone());
        self.save(&accounts).await?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        let email_key = normalize_email(email);
        let accounts = self.load().await?;
        Ok(accounts
            .into_iter()
            .find(|account| normalize_email(&account.email) == email_key))
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.load().await?.len())
    }
}
