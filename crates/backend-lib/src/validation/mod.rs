// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Form validation module.
//!
//! Every check runs before any account or session is touched, so a rejected
//! submission never leaves partial state behind.

use airavat_common::{JobApplication, LoginRequest, Position, SignupRequest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 128;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password cannot exceed 128 characters")]
    PasswordTooLong,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Unknown position: {0}")]
    InvalidPosition(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn require<'a>(value: &'a str, field: &'static str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    let email = require(email, "Email")?;
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

/// Validate a phone number
///
/// Spaces, dashes, dots, parentheses and a leading `+` are tolerated; what
/// remains must be 10 to 15 digits.
pub fn validate_phone(phone: &str) -> ValidationResult<&str> {
    let phone = require(phone, "Phone")?;
    let body = phone.strip_prefix('+').unwrap_or(phone);

    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {},
            _ => return Err(ValidationError::InvalidPhone),
        }
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone)
}

/// Validate a new password against its confirmation
///
/// The confirmation is compared byte for byte; length counts characters.
pub fn validate_new_password(
    password: &str,
    confirm_password: &str,
    min_length: usize,
) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::MissingField("Password"));
    }
    if password.as_bytes() != confirm_password.as_bytes() {
        return Err(ValidationError::PasswordMismatch);
    }

    let length = password.chars().count();
    if length < min_length {
        return Err(ValidationError::PasswordTooShort(min_length));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate a signup submission
pub fn validate_signup(req: &SignupRequest, min_password_length: usize) -> ValidationResult<()> {
    require(&req.full_name, "Full name")?;
    validate_email(&req.email)?;
    validate_phone(&req.phone)?;
    validate_new_password(&req.password, &req.confirm_password, min_password_length)
}

/// Validate a login submission
pub fn validate_login(req: &LoginRequest) -> ValidationResult<()> {
    require(&req.email, "Email")?;
    if req.password.is_empty() {
        return Err(ValidationError::MissingField("Password"));
    }
    Ok(())
}

/// Validate a career application and resolve its position
pub fn validate_application(app: &JobApplication) -> ValidationResult<Position> {
    require(&app.full_name, "Full name")?;
    validate_email(&app.email)?;
    validate_phone(&app.phone)?;
    let position = require(&app.position, "Position")?;
    let position = Position::from_form_value(position)
        .ok_or_else(|| ValidationError::InvalidPosition(position.to_string()))?;
    require(&app.why_join, "Why do you want to join")?;
    Ok(position)
}
