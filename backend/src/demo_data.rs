//! Demo roster seeded into a fresh store at startup.
//!
//! Four departments and ten accounts (one admin, one manager) with
//! mid-challenge step counters, all sharing [`DEMO_PASSWORD`]. The admin
//! and Brianna Smith are the default view-override pair.

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    DepartmentPersistenceError, DepartmentRepository, PasswordHasher, PasswordHasherError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AvatarUrl, Department, DepartmentId, DepartmentName, DepartmentValidationError, DisplayName,
    PREDEFINED_AVATARS, Password, PasswordPolicyError, Role, StepCounts, User, UserId,
    UserValidationError,
};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password123";

const DEPARTMENTS: [(&str, &str); 4] = [
    ("eng", "Engineering"),
    ("mkt", "Marketing"),
    ("sales", "Sales"),
    ("hr", "Human Resources"),
];

struct DemoUser {
    email: &'static str,
    name: &'static str,
    department: &'static str,
    role: Role,
    /// daily, weekly, total, previous daily, previous weekly
    steps: [u64; 5],
    daily_goal: u64,
}

const USERS: [DemoUser; 10] = [
    DemoUser {
        email: "babken.egoian@dhs.lacounty.gov",
        name: "Babken Egoian",
        department: "eng",
        role: Role::Admin,
        steps: [8_543, 45_210, 85_430, 7_500, 42_000],
        daily_goal: 10_000,
    },
    DemoUser {
        email: "brianna.smith@dhs.lacounty.gov",
        name: "Brianna Smith",
        department: "eng",
        role: Role::User,
        steps: [12_345, 61_234, 123_450, 11_500, 59_000],
        daily_goal: 8_000,
    },
    DemoUser {
        email: "charlie.brown@dhs.lacounty.gov",
        name: "Charlie Brown",
        department: "eng",
        role: Role::User,
        steps: [7_654, 38_901, 76_540, 8_000, 41_000],
        daily_goal: 9_000,
    },
    DemoUser {
        email: "diana.prince@dhs.lacounty.gov",
        name: "Diana Prince",
        department: "mkt",
        role: Role::Manager,
        steps: [15_234, 78_901, 152_340, 14_000, 75_000],
        daily_goal: 12_000,
    },
    DemoUser {
        email: "ethan.hunt@dhs.lacounty.gov",
        name: "Ethan Hunt",
        department: "mkt",
        role: Role::User,
        steps: [6_789, 34_567, 67_890, 7_100, 35_000],
        daily_goal: 7_000,
    },
    DemoUser {
        email: "fiona.glenanne@dhs.lacounty.gov",
        name: "Fiona Glenanne",
        department: "mkt",
        role: Role::User,
        steps: [9_876, 50_123, 98_760, 9_500, 48_000],
        daily_goal: 10_000,
    },
    DemoUser {
        email: "george.costanza@dhs.lacounty.gov",
        name: "George Costanza",
        department: "sales",
        role: Role::User,
        steps: [18_001, 91_234, 180_010, 17_500, 89_000],
        daily_goal: 15_000,
    },
    DemoUser {
        email: "hannah.montana@dhs.lacounty.gov",
        name: "Hannah Montana",
        department: "sales",
        role: Role::User,
        steps: [2_100, 10_500, 21_000, 2_500, 12_000],
        daily_goal: 5_000,
    },
    DemoUser {
        email: "ian.malcolm@dhs.lacounty.gov",
        name: "Ian Malcolm",
        department: "hr",
        role: Role::User,
        steps: [11_111, 55_555, 111_110, 10_000, 54_000],
        daily_goal: 11_000,
    },
    DemoUser {
        email: "jane.doe@dhs.lacounty.gov",
        name: "Jane Doe",
        department: "hr",
        role: Role::User,
        steps: [8_888, 44_444, 88_880, 8_500, 43_000],
        daily_goal: 8_000,
    },
];

/// Errors raised while seeding the demo roster.
#[derive(Debug, Error)]
pub enum DemoDataError {
    #[error("invalid demo department: {0}")]
    Department(#[from] DepartmentValidationError),
    #[error("invalid demo user: {0}")]
    User(#[from] UserValidationError),
    #[error("invalid demo password: {0}")]
    Password(#[from] PasswordPolicyError),
    #[error("failed to hash demo password: {0}")]
    Hash(#[from] PasswordHasherError),
    #[error("failed to store demo department: {0}")]
    DepartmentStore(#[from] DepartmentPersistenceError),
    #[error("failed to store demo user: {0}")]
    UserStore(#[from] UserPersistenceError),
}

/// Counts of records written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDataOutcome {
    pub departments: usize,
    pub users: usize,
}

/// The demo departments.
///
/// # Errors
/// Returns [`DemoDataError::Department`] if a built-in entry fails
/// validation.
pub fn demo_departments() -> Result<Vec<Department>, DemoDataError> {
    DEPARTMENTS
        .iter()
        .map(|(id, name)| -> Result<Department, DemoDataError> {
            Ok(Department::new(
                DepartmentId::new(id)?,
                DepartmentName::new(*name)?,
            ))
        })
        .collect()
}

/// The demo accounts with credentials hashed by `hasher`.
///
/// Avatars follow the predefined list in roster order.
///
/// # Errors
/// Returns a [`DemoDataError`] if an entry fails validation or hashing.
pub fn demo_users(hasher: &dyn PasswordHasher) -> Result<Vec<User>, DemoDataError> {
    let password = Password::new(DEMO_PASSWORD)?;
    USERS
        .iter()
        .zip(PREDEFINED_AVATARS.iter().cycle())
        .map(|(entry, avatar)| -> Result<User, DemoDataError> {
            let [daily, weekly, total, previous_daily, previous_weekly] = entry.steps;
            Ok(User::builder(
                UserId::new(entry.email)?,
                DisplayName::new(entry.name)?,
                DepartmentId::new(entry.department)?,
                hasher.hash(&password)?,
            )
            .avatar(AvatarUrl::new(avatar)?)
            .role(entry.role)
            .steps(StepCounts::new(
                daily,
                weekly,
                total,
                previous_daily,
                previous_weekly,
            ))
            .daily_goal(entry.daily_goal)
            .build())
        })
        .collect()
}

/// Write the demo roster into `store`.
///
/// # Errors
/// Fails on the first record the store rejects; earlier records stay.
pub async fn seed_demo_data<S>(
    store: &S,
    hasher: &dyn PasswordHasher,
) -> Result<DemoDataOutcome, DemoDataError>
where
    S: UserRepository + DepartmentRepository,
{
    let departments = demo_departments()?;
    for department in &departments {
        DepartmentRepository::insert(store, department).await?;
    }
    let users = demo_users(hasher)?;
    for user in &users {
        UserRepository::insert(store, user).await?;
    }

    let outcome = DemoDataOutcome {
        departments: departments.len(),
        users: users.len(),
    };
    info!(
        departments = outcome.departments,
        users = outcome.users,
        "demo data seeded"
    );
    Ok(outcome)
}
