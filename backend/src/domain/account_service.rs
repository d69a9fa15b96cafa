//! Self-service account lifecycle.
//!
//! Implements [`AccountCommand`]: signup with emailed verification, login,
//! and profile updates (avatar, password, daily steps).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::ports::{
    AccountCommand, DepartmentRepository, PasswordHasher, PendingSignup,
    PendingVerificationRepository, SignupRequest, UserRepository, VerificationNotifier,
    VerifyEmailRequest,
};
use super::service_support::{
    ensure_department_exists, ensure_email_free, map_hasher_error, map_notifier_error,
    map_pending_error, map_user_error, settle_user_update, step_update_error,
    user_validation_error,
};
use super::{
    AvatarUrl, DEFAULT_VERIFICATION_TTL, DailySteps, Error, LoginCredentials,
    PasswordChange, PendingVerification, Redemption, User, UserId, VerificationCode,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const INVALID_CODE: &str = "Invalid verification code.";
const EXPIRED_CODE: &str = "Verification code expired.";

/// Tunables for the account service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSettings {
    /// Lifetime of a pending verification.
    pub verification_ttl: Duration,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            verification_ttl: DEFAULT_VERIFICATION_TTL,
        }
    }
}

/// Account service implementing the [`AccountCommand`] driving port.
#[derive(Clone)]
pub struct AccountService<U, D, P> {
    users: Arc<U>,
    departments: Arc<D>,
    pending: Arc<P>,
    notifier: Arc<dyn VerificationNotifier>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    settings: AccountSettings,
}

impl<U, D, P> AccountService<U, D, P> {
    /// Create a service with default settings.
    pub fn new(
        users: Arc<U>,
        departments: Arc<D>,
        pending: Arc<P>,
        notifier: Arc<dyn VerificationNotifier>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            departments,
            pending,
            notifier,
            hasher,
            clock,
            settings: AccountSettings::default(),
        }
    }

    /// Override the default settings.
    #[must_use]
    pub fn with_settings(mut self, settings: AccountSettings) -> Self {
        self.settings = settings;
        self
    }

    fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.settings.verification_ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(created_at)
    }
}

#[async_trait]
impl<U, D, P> AccountCommand for AccountService<U, D, P>
where
    U: UserRepository,
    D: DepartmentRepository,
    P: PendingVerificationRepository,
{
    async fn signup(&self, request: SignupRequest) -> Result<PendingSignup, Error> {
        let SignupRequest {
            name,
            email,
            password,
            department_id,
        } = request;

        email
            .ensure_corporate()
            .map_err(|err| user_validation_error("email", &err))?;
        ensure_email_free(self.users.as_ref(), &email).await?;
        ensure_department_exists(self.departments.as_ref(), &department_id).await?;

        let hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let avatar = AvatarUrl::random(&mut rand::thread_rng());
        let code = VerificationCode::generate(&mut rand::thread_rng());
        let user = User::builder(email.clone(), name, department_id, hash)
            .avatar(avatar)
            .build();

        let created_at = self.clock.utc();
        self.pending
            .put(PendingVerification::new(user, code.clone(), created_at))
            .await
            .map_err(map_pending_error)?;
        self.notifier
            .send_code(&email, &code)
            .await
            .map_err(map_notifier_error)?;

        info!(email = %email, "signup pending verification");
        Ok(PendingSignup {
            email,
            expires_at: self.expires_at(created_at),
        })
    }

    async fn verify_email(&self, request: VerifyEmailRequest) -> Result<User, Error> {
        let now = self.clock.utc();
        let ttl = self.settings.verification_ttl;
        let code = request.code;
        let outcome = self
            .pending
            .redeem(&request.email, move |pending| pending.assess(&code, now, ttl))
            .await
            .map_err(map_pending_error)?;

        let pending = match outcome {
            Some((Redemption::Accepted, pending)) => pending,
            Some((Redemption::Expired, _)) => {
                warn!(email = %request.email, "verification code expired");
                return Err(Error::invalid_request(EXPIRED_CODE)
                    .with_details(json!({ "field": "code", "code": "expired" })));
            }
            Some((Redemption::WrongCode, _)) | None => {
                warn!(email = %request.email, "verification code rejected");
                return Err(Error::invalid_request(INVALID_CODE)
                    .with_details(json!({ "field": "code", "code": "invalid_code" })));
            }
        };

        let user = pending.into_user();
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user = %user.id(), "account verified");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_id(credentials.email())
            .await
            .map_err(map_user_error)?;
        let Some(user) = user else {
            warn!(email = %credentials.email(), "login for unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(user = %user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user = %user.id(), "login succeeded");
        Ok(user)
    }

    async fn update_avatar(&self, user_id: &UserId, avatar: AvatarUrl) -> Result<User, Error> {
        let outcome = self
            .users
            .update(user_id, move |user, _| {
                user.set_avatar(avatar);
                Ok(user.clone())
            })
            .await;
        settle_user_update(outcome)
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        change: PasswordChange,
    ) -> Result<User, Error> {
        let hash = self
            .hasher
            .hash(change.password())
            .map_err(map_hasher_error)?;
        let outcome = self
            .users
            .update(user_id, move |user, _| {
                user.set_password_hash(hash, false);
                Ok(user.clone())
            })
            .await;
        let user = settle_user_update(outcome)?;
        info!(user = %user.id(), "password changed");
        Ok(user)
    }

    async fn update_steps(&self, user_id: &UserId, steps: DailySteps) -> Result<User, Error> {
        let outcome = self
            .users
            .update(user_id, move |user, _| {
                user.record_daily_steps(steps).map_err(step_update_error)?;
                Ok(user.clone())
            })
            .await;
        match settle_user_update(outcome) {
            Ok(user) => {
                info!(user = %user.id(), daily = steps.get(), "daily steps recorded");
                Ok(user)
            }
            Err(err) => {
                warn!(user = %user_id, error = %err, "step update rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
