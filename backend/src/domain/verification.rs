//! Email verification codes and pending signups.
//!
//! A signup is parked as a [`PendingVerification`] until the emailed code is
//! redeemed. Records older than the configured time-to-live are discarded on
//! the next redemption attempt.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::user::{User, UserId};

/// Number of digits in a verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Default lifetime of a pending verification.
pub const DEFAULT_VERIFICATION_TTL: Duration = Duration::from_secs(300);

/// Six-digit verification code.
///
/// # Examples
/// ```
/// use step_challenge::domain::VerificationCode;
///
/// let code: VerificationCode = " 012345 ".parse().expect("six digits");
/// assert_eq!(code.as_ref(), "012345");
/// assert!("12345".parse::<VerificationCode>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

/// Error returned when a submitted code is not six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("verification code must be {VERIFICATION_CODE_LENGTH} digits")]
pub struct MalformedCode;

impl VerificationCode {
    /// Draw a fresh code uniformly from `000000..=999999`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value: u32 = rng.gen_range(0..1_000_000);
        Self(format!("{value:06}"))
    }
}

impl std::str::FromStr for VerificationCode {
    type Err = MalformedCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.len() == VERIFICATION_CODE_LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(MalformedCode)
        }
    }
}

impl AsRef<str> for VerificationCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Signup awaiting code redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    code: VerificationCode,
    user: User,
    created_at: DateTime<Utc>,
}

impl PendingVerification {
    /// Park `user` behind `code`.
    pub fn new(user: User, code: VerificationCode, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            user,
            created_at,
        }
    }

    /// Email the code was sent to.
    pub fn email(&self) -> &UserId {
        self.user.id()
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }

    /// The uncommitted account.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `now` is past the record's lifetime.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.created_at) > ttl,
            Err(_) => false,
        }
    }

    /// Decide what a redemption attempt with `submitted` does.
    pub fn assess(&self, submitted: &VerificationCode, now: DateTime<Utc>, ttl: Duration) -> Redemption {
        if self.is_expired(now, ttl) {
            Redemption::Expired
        } else if &self.code == submitted {
            Redemption::Accepted
        } else {
            Redemption::WrongCode
        }
    }

    /// Hand back the parked account.
    pub fn into_user(self) -> User {
        self.user
    }
}

/// Outcome of checking a code against a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// Code matches and the record is live; consume it.
    Accepted,
    /// Code does not match; keep the record.
    WrongCode,
    /// Record outlived its TTL; discard it.
    Expired,
}

impl Redemption {
    /// Whether the stored record should be removed.
    pub fn removes_record(self) -> bool {
        !matches!(self, Self::WrongCode)
    }
}
