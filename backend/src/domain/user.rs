//! User aggregate and its value types.
//!
//! A user is identified by their email address, which doubles as the login
//! name and the foreign key used by messages and support threads.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::department::DepartmentId;
use super::password::PasswordHash;
use super::steps::{DailySteps, StepCounts, StepUpdateError};

/// Email suffix every account must carry.
pub const CORPORATE_EMAIL_SUFFIX: &str = "@dhs.lacounty.gov";

/// Daily step goal assigned to new accounts.
pub const DEFAULT_DAILY_GOAL: u64 = 10_000;

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Avatar images a user may pick from.
pub const PREDEFINED_AVATARS: [&str; 12] = [
    "https://placehold.co/100x100/F87171/FFFFFF.png",
    "https://placehold.co/100x100/FBBF24/FFFFFF.png",
    "https://placehold.co/100x100/34D399/FFFFFF.png",
    "https://placehold.co/100x100/60A5FA/FFFFFF.png",
    "https://placehold.co/100x100/A78BFA/FFFFFF.png",
    "https://placehold.co/100x100/F472B6/FFFFFF.png",
    "https://placehold.co/100x100/4FD1C5/FFFFFF.png",
    "https://placehold.co/100x100/9CA3AF/FFFFFF.png",
    "https://placehold.co/100x100/fd9b52/FFFFFF.png",
    "https://placehold.co/100x100/c084fc/FFFFFF.png",
    "https://placehold.co/100x100/2dd4bf/FFFFFF.png",
    "https://placehold.co/100x100/fb7185/FFFFFF.png",
];

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email is not of the form `local@domain`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Email does not belong to the corporate domain.
    #[error("Only {CORPORATE_EMAIL_SUFFIX} emails are allowed.")]
    ForeignDomain,
    /// Display name was blank.
    #[error("name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeds [`DISPLAY_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    /// Avatar is not one of [`PREDEFINED_AVATARS`].
    #[error("Invalid avatar selected.")]
    UnknownAvatar,
    /// Role string is not `user`, `manager` or `admin`.
    #[error("role must be one of user, manager, admin")]
    UnknownRole,
}

/// Stable user identifier: a normalised (trimmed, lowercase) email address.
///
/// # Examples
/// ```
/// use step_challenge::domain::UserId;
///
/// let id = UserId::new("  Jane.Doe@DHS.LACounty.gov ").expect("valid email");
/// assert_eq!(id.as_ref(), "jane.doe@dhs.lacounty.gov");
/// assert!(id.is_corporate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// Whether the address sits on the corporate domain.
    pub fn is_corporate(&self) -> bool {
        self.0.ends_with(CORPORATE_EMAIL_SUFFIX)
    }

    /// Fail with [`UserValidationError::ForeignDomain`] unless corporate.
    pub fn ensure_corporate(&self) -> Result<(), UserValidationError> {
        if self.is_corporate() {
            Ok(())
        } else {
            Err(UserValidationError::ForeignDomain)
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown on leaderboards and in chats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Join a first and last name the way admin-created accounts are named.
    pub fn from_parts(first: &str, last: &str) -> Result<Self, UserValidationError> {
        Self::new(format!("{} {}", first.trim(), last.trim()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role. Capabilities per role live in [`super::authorization`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular participant.
    User,
    /// May create users and answer support threads.
    Manager,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Wire representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Avatar reference restricted to [`PREDEFINED_AVATARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Accept only one of the predefined avatar URLs.
    pub fn new(url: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let url = url.as_ref();
        if PREDEFINED_AVATARS.contains(&url) {
            Ok(Self(url.to_owned()))
        } else {
            Err(UserValidationError::UnknownAvatar)
        }
    }

    /// Pick a predefined avatar at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let url = PREDEFINED_AVATARS
            .choose(rng)
            .copied()
            .unwrap_or(PREDEFINED_AVATARS[0]);
        Self(url.to_owned())
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AvatarUrl> for String {
    fn from(value: AvatarUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for AvatarUrl {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is a normalised email address.
/// - `steps.total >= steps.daily` and `steps.weekly >= steps.daily` hold for
///   records created through this type; step updates preserve them.
/// - The credential is only ever held as a salted hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    avatar: AvatarUrl,
    password_hash: PasswordHash,
    department_id: DepartmentId,
    role: Role,
    steps: StepCounts,
    daily_goal: u64,
    must_change_password: bool,
}

impl User {
    /// Start building a user with zeroed steps, role `user` and the default goal.
    pub fn builder(
        id: UserId,
        name: DisplayName,
        department_id: DepartmentId,
        password_hash: PasswordHash,
    ) -> UserBuilder {
        UserBuilder {
            user: Self {
                id,
                name,
                avatar: AvatarUrl(PREDEFINED_AVATARS[0].to_owned()),
                password_hash,
                department_id,
                role: Role::User,
                steps: StepCounts::default(),
                daily_goal: DEFAULT_DAILY_GOAL,
                must_change_password: false,
            },
        }
    }

    /// Stable user identifier (email).
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Selected avatar.
    pub fn avatar(&self) -> &AvatarUrl {
        &self.avatar
    }

    /// Stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Department the user competes for.
    pub fn department_id(&self) -> &DepartmentId {
        &self.department_id
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Step counters.
    pub fn steps(&self) -> &StepCounts {
        &self.steps
    }

    /// Personal daily step goal.
    pub fn daily_goal(&self) -> u64 {
        self.daily_goal
    }

    /// Whether the next session must rotate the credential.
    pub fn must_change_password(&self) -> bool {
        self.must_change_password
    }

    /// Replace the avatar.
    pub fn set_avatar(&mut self, avatar: AvatarUrl) {
        self.avatar = avatar;
    }

    /// Replace the credential hash and set the rotation flag.
    pub fn set_password_hash(&mut self, hash: PasswordHash, must_change_password: bool) {
        self.password_hash = hash;
        self.must_change_password = must_change_password;
    }

    /// Move the user to a department and role.
    pub fn reassign(&mut self, department_id: DepartmentId, role: Role) {
        self.department_id = department_id;
        self.role = role;
    }

    /// Replace today's step count, adjusting the running aggregates.
    ///
    /// Leaves the user untouched when the update is rejected.
    pub fn record_daily_steps(&mut self, steps: DailySteps) -> Result<&StepCounts, StepUpdateError> {
        self.steps = self.steps.with_daily(steps)?;
        Ok(&self.steps)
    }
}

/// Builder for [`User`] records.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// Set the avatar.
    #[must_use]
    pub fn avatar(mut self, avatar: AvatarUrl) -> Self {
        self.user.avatar = avatar;
        self
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.user.role = role;
        self
    }

    /// Seed the step counters.
    #[must_use]
    pub fn steps(mut self, steps: StepCounts) -> Self {
        self.user.steps = steps;
        self
    }

    /// Set the daily goal; zero is raised to one.
    #[must_use]
    pub fn daily_goal(mut self, goal: u64) -> Self {
        self.user.daily_goal = goal.max(1);
        self
    }

    /// Require a credential rotation on next session.
    #[must_use]
    pub fn must_change_password(mut self, flag: bool) -> Self {
        self.user.must_change_password = flag;
        self
    }

    /// Finish the record.
    pub fn build(self) -> User {
        self.user
    }
}

#[cfg(test)]
mod tests;
