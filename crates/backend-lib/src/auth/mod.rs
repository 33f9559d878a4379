// ============================
// airavat-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

mod extractor;
mod issuer;
pub mod password;
pub mod session;
pub mod token_generator;

pub use extractor::{AdminSession, CurrentSession};
pub use issuer::SessionIssuer;
pub use password::{hash_password, hash_password_secure, verify_password};
pub use session::{Session, SessionManager, SESSION_TTL};
pub use token_generator::generate_secure_token;
