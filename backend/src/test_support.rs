//! Test utilities for the step challenge crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature).

mod clock;

pub use clock::MutableClock;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{
    Department, DepartmentId, DepartmentName, DisplayName, Password, PasswordHash, Role,
    StepCounts, User, UserId,
};

const FIXTURE_PREFIX: &str = "fixture$";

/// Reversible stand-in for Argon2 so tests do not pay the hashing cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::from_phc(format!(
            "{FIXTURE_PREFIX}{}",
            password.expose()
        )))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        match hash.as_phc().strip_prefix(FIXTURE_PREFIX) {
            Some(stored) => Ok(stored == candidate),
            None => Err(PasswordHasherError::malformed("not a fixture hash")),
        }
    }
}

/// Hash of `password` as produced by [`FixturePasswordHasher`].
pub fn fixture_hash(password: &str) -> PasswordHash {
    PasswordHash::from_phc(format!("{FIXTURE_PREFIX}{password}"))
}

pub fn user_id(email: &str) -> UserId {
    match UserId::new(email) {
        Ok(id) => id,
        Err(error) => panic!("fixture email {email:?} is invalid: {error}"),
    }
}

pub fn department_id(id: &str) -> DepartmentId {
    match DepartmentId::new(id) {
        Ok(id) => id,
        Err(error) => panic!("fixture department {id:?} is invalid: {error}"),
    }
}

pub fn department(id: &str, name: &str) -> Department {
    match DepartmentName::new(name) {
        Ok(name) => Department::new(department_id(id), name),
        Err(error) => panic!("fixture department name {name:?} is invalid: {error}"),
    }
}

fn fixture_name(email: &str) -> DisplayName {
    let local = email.split('@').next().unwrap_or(email);
    match DisplayName::new(local) {
        Ok(name) => name,
        Err(error) => panic!("fixture name {local:?} is invalid: {error}"),
    }
}

/// A member of `department` whose password is `password123`.
pub fn member(email: &str, department: &str, role: Role) -> User {
    member_with_steps(email, department, role, StepCounts::default())
}

/// As [`member`], with the given counters.
pub fn member_with_steps(email: &str, department: &str, role: Role, steps: StepCounts) -> User {
    User::builder(
        user_id(email),
        fixture_name(email),
        department_id(department),
        fixture_hash("password123"),
    )
    .role(role)
    .steps(steps)
    .build()
}
