//! Error mapping shared by the domain services.

use serde_json::json;

use super::ports::{
    DepartmentMessagePersistenceError, DepartmentPersistenceError, DepartmentRepository,
    PasswordHasherError, PendingVerificationPersistenceError, SupportThreadPersistenceError,
    UserPersistenceError, UserRepository, VerificationNotifierError,
};
use super::{
    DepartmentId, Error, RosterRuleViolation, StepUpdateError, UserId, UserValidationError,
};

pub(crate) const USER_NOT_FOUND: &str = "User not found.";
pub(crate) const DEPARTMENT_NOT_FOUND: &str = "Department not found.";
pub(crate) const DUPLICATE_USER: &str = "User with this email already exists.";
pub(crate) const DUPLICATE_DEPARTMENT: &str = "A department with this name already exists.";

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Duplicate { .. } => Error::conflict(DUPLICATE_USER),
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_department_error(error: DepartmentPersistenceError) -> Error {
    match error {
        DepartmentPersistenceError::DuplicateId { id } => Error::conflict(DUPLICATE_DEPARTMENT)
            .with_details(json!({ "field": "name", "code": "duplicate_id", "id": id })),
        DepartmentPersistenceError::DuplicateName { name } => Error::conflict(DUPLICATE_DEPARTMENT)
            .with_details(json!({ "field": "name", "code": "duplicate_name", "name": name })),
        DepartmentPersistenceError::Query { message } => {
            Error::internal(format!("department repository error: {message}"))
        }
    }
}

pub(crate) fn map_message_error(error: DepartmentMessagePersistenceError) -> Error {
    match error {
        DepartmentMessagePersistenceError::Query { message } => {
            Error::internal(format!("department message repository error: {message}"))
        }
    }
}

pub(crate) fn map_thread_error(error: SupportThreadPersistenceError) -> Error {
    match error {
        SupportThreadPersistenceError::Query { message } => {
            Error::internal(format!("support thread repository error: {message}"))
        }
    }
}

pub(crate) fn map_pending_error(error: PendingVerificationPersistenceError) -> Error {
    match error {
        PendingVerificationPersistenceError::Query { message } => {
            Error::internal(format!("pending verification repository error: {message}"))
        }
    }
}

pub(crate) fn map_notifier_error(error: VerificationNotifierError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn user_validation_error(field: &str, error: &UserValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

pub(crate) fn step_update_error(error: StepUpdateError) -> Error {
    match error {
        StepUpdateError::Negative => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "steps", "code": "negative" })),
        StepUpdateError::Inconsistent { counter } | StepUpdateError::Overflow { counter } => {
            Error::conflict("Stored step counters are inconsistent; no change was made.")
                .with_details(json!({ "counter": counter, "reason": error.to_string() }))
        }
    }
}

pub(crate) fn roster_rule_error(violation: RosterRuleViolation) -> Error {
    match violation {
        RosterRuleViolation::LastAdmin => Error::conflict(violation.to_string())
            .with_details(json!({ "code": "last_admin" })),
        RosterRuleViolation::SelfDeletion => Error::forbidden(violation.to_string())
            .with_details(json!({ "code": "self_deletion" })),
    }
}

/// Flatten a closure-based user update, treating a missing user as 404.
pub(crate) fn settle_user_update<T>(
    outcome: Result<Option<Result<T, Error>>, UserPersistenceError>,
) -> Result<T, Error> {
    match outcome.map_err(map_user_error)? {
        Some(result) => result,
        None => Err(Error::not_found(USER_NOT_FOUND)),
    }
}

pub(crate) async fn ensure_department_exists<D: DepartmentRepository>(
    departments: &D,
    id: &DepartmentId,
) -> Result<(), Error> {
    let found = departments.find_by_id(id).await.map_err(map_department_error)?;
    match found {
        Some(_) => Ok(()),
        None => Err(Error::not_found(DEPARTMENT_NOT_FOUND)
            .with_details(json!({ "field": "departmentId", "code": "unknown_department" }))),
    }
}

pub(crate) async fn ensure_email_free<U: UserRepository>(
    users: &U,
    email: &UserId,
) -> Result<(), Error> {
    let existing = users.find_by_id(email).await.map_err(map_user_error)?;
    if existing.is_some() {
        return Err(Error::conflict(DUPLICATE_USER)
            .with_details(json!({ "field": "email", "code": "duplicate_email" })));
    }
    Ok(())
}
