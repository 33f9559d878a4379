// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the Airavat site clients and server.
//! This module defines the JSON bodies of the signup, login and
//! career-application endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "<redacted>";

/// Signup form submission
///
/// Every field defaults to empty so that a missing field surfaces as a
/// validation message rather than a deserialization failure.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    /// Full name of the account holder
    pub full_name: String,
    /// Contact email, unique per account
    pub email: String,
    /// Contact phone number, unique per account
    pub phone: String,
    /// Chosen password (min 6 chars)
    pub password: String,
    /// Must equal `password` byte for byte
    pub confirm_password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &REDACTED)
            .field("confirm_password", &REDACTED)
            .finish()
    }
}

/// Login form submission
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Public projection of an account, echoed back after signup or login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Whether the account may enter the admin area
    #[serde(default)]
    pub is_admin: bool,
}

/// Successful signup or login
///
/// `Debug` never prints the token.
#[derive(Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    /// Opaque bearer token; clients present it as a cookie or `Authorization` header
    pub token: String,
    /// Profile echo
    pub user: UserProfile,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &REDACTED)
            .field("user", &self.user)
            .finish()
    }
}

/// Failure body returned by every endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    /// Human readable description
    pub message: String,
    /// Stable machine readable code (e.g. `VAL_001`)
    #[serde(default)]
    pub code: String,
}

/// Positions offered on the careers page
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    SecurityGuard,
    Supervisor,
    Cctv,
    Housekeeping,
}

impl Position {
    /// Parse the form value of the position select box
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "security-guard" => Some(Self::SecurityGuard),
            "supervisor" => Some(Self::Supervisor),
            "cctv" => Some(Self::Cctv),
            "housekeeping" => Some(Self::Housekeeping),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityGuard => "security-guard",
            Self::Supervisor => "supervisor",
            Self::Cctv => "cctv",
            Self::Housekeeping => "housekeeping",
        }
    }
}

/// Career application form submission
///
/// Only the fields marked required on the form are validated; the rest are
/// accepted as given.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplication {
    // required
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Raw form value, see [`Position::from_form_value`]
    pub position: String,
    pub why_join: String,

    pub dob: String,
    pub address: String,
    pub preferred_location: String,
    pub join_date: String,
    /// `day`, `night`, or `any`
    pub shift: String,
    pub education: String,
    pub experience: String,
    pub ex_serviceman: bool,
    pub previous_work: String,
    pub languages: Vec<String>,
    pub skills: String,
}

/// Acknowledgement of a career application
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplicationAck {
    pub success: bool,
    pub message: String,
}
