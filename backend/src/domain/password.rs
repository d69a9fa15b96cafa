//! Password policy and hashed credential storage.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use zeroize::Zeroizing;

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Length of generated temporary passwords.
pub const TEMPORARY_PASSWORD_LENGTH: usize = 12;

/// Password policy violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    /// A required password field was empty.
    #[error("Both password fields are required.")]
    Missing,
    /// Password shorter than [`PASSWORD_MIN_LENGTH`].
    #[error("Password must be at least {min} characters long.")]
    TooShort { min: usize },
    /// Confirmation did not match.
    #[error("Passwords do not match.")]
    Mismatch,
}

/// A plaintext password that satisfies the policy. Cleared on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a password of at least [`PASSWORD_MIN_LENGTH`] characters.
    ///
    /// Whitespace is preserved.
    pub fn new(raw: &str) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Missing);
        }
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Generate a random alphanumeric temporary password.
    pub fn generate_temporary<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let raw: String = rng
            .sample_iter(&Alphanumeric)
            .take(TEMPORARY_PASSWORD_LENGTH)
            .map(char::from)
            .collect();
        Self(Zeroizing::new(raw))
    }

    /// Plaintext, for hashing or returning a temporary password once.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// A password change request whose two entries agree.
///
/// # Examples
/// ```
/// use step_challenge::domain::{PasswordChange, PasswordPolicyError};
///
/// assert!(PasswordChange::try_from_parts("longenough", "longenough").is_ok());
/// assert_eq!(
///     PasswordChange::try_from_parts("longenough", "different1").unwrap_err(),
///     PasswordPolicyError::Mismatch
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange(Password);

impl PasswordChange {
    /// Check presence, then length, then agreement.
    pub fn try_from_parts(new_password: &str, confirm: &str) -> Result<Self, PasswordPolicyError> {
        if new_password.is_empty() || confirm.is_empty() {
            return Err(PasswordPolicyError::Missing);
        }
        let password = Password::new(new_password)?;
        if new_password != confirm {
            return Err(PasswordPolicyError::Mismatch);
        }
        Ok(Self(password))
    }

    /// The accepted password.
    pub fn password(&self) -> &Password {
        &self.0
    }
}

/// Salted one-way hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a hasher.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}
