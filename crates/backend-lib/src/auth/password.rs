// ============================
// airavat-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use dashmap::DashMap;
use std::sync::LazyLock;
use zeroize::Zeroize;

use super::token_generator::generate_secure_token;

/// Block size and parallelism follow the scrypt recommendations; only the
/// cost (`log_n`) is tunable.
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_OUTPUT_LEN: usize = 32;

/// One throwaway hash per cost, built on first use
static DUMMY_HASHES: LazyLock<DashMap<u8, String>> = LazyLock::new(DashMap::new);

/// Hash a password using scrypt, producing a PHC string
///
/// CPU bound; call it from `spawn_blocking` inside async code.
pub fn hash_password(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params::new(log_n, SCRYPT_R, SCRYPT_P, SCRYPT_OUTPUT_LEN)?;
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
///
/// A hash that does not parse never verifies.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash of a random, never-issued password at the given cost
///
/// Logins for unknown accounts verify against this so they cost the same
/// as logins for real ones.
pub fn dummy_hash(log_n: u8) -> anyhow::Result<String> {
    if let Some(hash) = DUMMY_HASHES.get(&log_n) {
        return Ok(hash.clone());
    }
    let hash = hash_password(&generate_secure_token(), log_n)?;
    DUMMY_HASHES.insert(log_n, hash.clone());
    Ok(hash)
}

/// Hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String, log_n: u8) -> anyhow::Result<String> {
    let hash = hash_password(plain, log_n);
    plain.zeroize();
    hash
}
