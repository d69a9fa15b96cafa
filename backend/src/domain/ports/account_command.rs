//! Driving port for self-service account operations.
//!
//! Requests carry already-validated domain values; inbound adapters own the
//! mapping from raw payloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AvatarUrl, DailySteps, DepartmentId, DisplayName, Error, LoginCredentials, Password,
    PasswordChange, User, UserId, VerificationCode,
};

/// Self-service signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: DisplayName,
    pub email: UserId,
    pub password: Password,
    pub department_id: DepartmentId,
}

/// A signup parked until its code is redeemed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignup {
    pub email: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Code redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyEmailRequest {
    pub email: UserId,
    pub code: VerificationCode,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Park a signup and send its verification code. No user is created.
    async fn signup(&self, request: SignupRequest) -> Result<PendingSignup, Error>;

    /// Redeem a code and commit the parked user.
    async fn verify_email(&self, request: VerifyEmailRequest) -> Result<User, Error>;

    /// Check credentials and return the account.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Select one of the predefined avatars.
    async fn update_avatar(&self, user_id: &UserId, avatar: AvatarUrl) -> Result<User, Error>;

    /// Rotate the credential and clear the forced-change flag.
    async fn update_password(&self, user_id: &UserId, change: PasswordChange)
    -> Result<User, Error>;

    /// Replace today's step count.
    async fn update_steps(&self, user_id: &UserId, steps: DailySteps) -> Result<User, Error>;
}
