//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email or password was missing.
    Missing,
    /// Email could not be parsed.
    InvalidEmail(UserValidationError),
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Email and password are required."),
            Self::InvalidEmail(_) => write!(f, "Invalid email or password."),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is a normalised [`UserId`].
/// - `password` is non-empty and keeps caller-provided whitespace. Length
///   rules are not applied at login so legacy credentials keep working.
///
/// # Examples
/// ```
/// use step_challenge::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Jane@dhs.lacounty.gov ", "password123")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_ref(), "jane@dhs.lacounty.gov");
/// assert_eq!(creds.password(), "password123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: UserId,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(LoginValidationError::Missing);
        }
        let email = UserId::new(email).map_err(LoginValidationError::InvalidEmail)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account identifier to look up.
    pub fn email(&self) -> &UserId {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
