//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies use optional fields so a missing value produces a
//! `missing_field` error naming the field instead of a generic body error.
//! Each helper turns one raw field into its domain value.

use std::fmt::Display;

use serde_json::json;

use crate::domain::{
    AvatarUrl, DailySteps, DepartmentId, DepartmentName, DepartmentValidationError, DisplayName,
    Error, LoginCredentials, LoginValidationError, MessageContent, Password, PasswordChange,
    PasswordPolicyError, Role, Timeframe, UserId, UserValidationError, VerificationCode,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    PasswordPolicy,
    InvalidCode,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::PasswordPolicy => "password_policy",
            ErrorCode::InvalidCode => "invalid_code",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const FIRST_NAME: FieldName = FieldName::new("firstName");
pub(crate) const LAST_NAME: FieldName = FieldName::new("lastName");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const NEW_PASSWORD: FieldName = FieldName::new("newPassword");
pub(crate) const CONFIRM_PASSWORD: FieldName = FieldName::new("confirmPassword");
pub(crate) const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
pub(crate) const ROLE: FieldName = FieldName::new("role");
pub(crate) const CODE: FieldName = FieldName::new("code");
pub(crate) const AVATAR_URL: FieldName = FieldName::new("avatarUrl");
pub(crate) const STEPS: FieldName = FieldName::new("steps");
pub(crate) const CONTENT: FieldName = FieldName::new("content");
pub(crate) const TIMEFRAME: FieldName = FieldName::new("timeframe");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_field_error(field: FieldName, error: impl Display) -> Error {
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}

/// Require a field to be present and not blank.
pub(crate) fn required(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw),
        _ => Err(missing_field_error(field)),
    }
}

fn user_error(field: FieldName, error: &UserValidationError) -> Error {
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}

pub(crate) fn parse_email(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    let raw = required(value, field)?;
    UserId::new(raw).map_err(|err| user_error(field, &err))
}

pub(crate) fn parse_display_name(value: Option<String>) -> Result<DisplayName, Error> {
    let raw = required(value, NAME)?;
    DisplayName::new(raw).map_err(|err| user_error(NAME, &err))
}

/// Join first and last names into a display name.
pub(crate) fn parse_name_parts(
    first: Option<String>,
    last: Option<String>,
) -> Result<DisplayName, Error> {
    let first = required(first, FIRST_NAME)?;
    let last = required(last, LAST_NAME)?;
    DisplayName::from_parts(&first, &last).map_err(|err| user_error(NAME, &err))
}

pub(crate) fn parse_password(value: Option<String>) -> Result<Password, Error> {
    let raw = value.unwrap_or_default();
    if raw.is_empty() {
        return Err(missing_field_error(PASSWORD));
    }
    Password::new(&raw)
        .map_err(|err| field_error(PASSWORD, ErrorCode::PasswordPolicy, err.to_string()))
}

/// Check a new password against its confirmation.
pub(crate) fn parse_password_change(
    new_password: Option<String>,
    confirm: Option<String>,
) -> Result<PasswordChange, Error> {
    let new_password = new_password.unwrap_or_default();
    let confirm = confirm.unwrap_or_default();
    PasswordChange::try_from_parts(&new_password, &confirm).map_err(|err| {
        let field = match err {
            PasswordPolicyError::Mismatch => CONFIRM_PASSWORD,
            _ => NEW_PASSWORD,
        };
        field_error(field, ErrorCode::PasswordPolicy, err.to_string())
    })
}

/// Login input. A malformed email reads as a failed login, not a bad request.
pub(crate) fn parse_login(
    email: Option<String>,
    password: Option<String>,
) -> Result<LoginCredentials, Error> {
    let email = email.unwrap_or_default();
    let password = password.unwrap_or_default();
    LoginCredentials::try_from_parts(&email, &password).map_err(|err| match err {
        LoginValidationError::Missing => Error::invalid_request(err.to_string())
            .with_details(json!({ "code": ErrorCode::MissingField.as_str() })),
        LoginValidationError::InvalidEmail(_) => Error::unauthorized(err.to_string()),
    })
}

pub(crate) fn parse_department_id(
    value: Option<String>,
    field: FieldName,
) -> Result<DepartmentId, Error> {
    let raw = required(value, field)?;
    DepartmentId::new(raw.trim()).map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn parse_department_name(value: Option<String>) -> Result<DepartmentName, Error> {
    let raw = value.unwrap_or_default();
    DepartmentName::new(raw).map_err(|err| {
        if matches!(err, DepartmentValidationError::EmptyName) {
            missing_field_error(NAME)
        } else {
            invalid_field_error(NAME, err)
        }
    })
}

pub(crate) fn parse_role(value: Option<String>) -> Result<Role, Error> {
    let raw = required(value, ROLE)?;
    raw.parse::<Role>().map_err(|err| user_error(ROLE, &err))
}

/// An absent or blank role means "let the server decide".
pub(crate) fn parse_optional_role(value: Option<String>) -> Result<Option<Role>, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_role(Some(raw)).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn parse_verification_code(value: Option<String>) -> Result<VerificationCode, Error> {
    let raw = required(value, CODE)?;
    raw.parse::<VerificationCode>()
        .map_err(|_| field_error(CODE, ErrorCode::InvalidCode, "Invalid verification code."))
}

pub(crate) fn parse_avatar(value: Option<String>) -> Result<AvatarUrl, Error> {
    let raw = required(value, AVATAR_URL)?;
    AvatarUrl::new(raw).map_err(|err| user_error(AVATAR_URL, &err))
}

pub(crate) fn parse_steps(value: Option<i64>) -> Result<DailySteps, Error> {
    let raw = value.ok_or_else(|| missing_field_error(STEPS))?;
    DailySteps::try_from(raw).map_err(|err| invalid_field_error(STEPS, err))
}

pub(crate) fn parse_content(value: Option<String>) -> Result<MessageContent, Error> {
    let raw = value.unwrap_or_default();
    MessageContent::new(raw).map_err(|err| invalid_field_error(CONTENT, err))
}

/// Missing timeframe falls back to the overall total.
pub(crate) fn parse_timeframe(value: Option<String>) -> Result<Timeframe, Error> {
    match value {
        None => Ok(Timeframe::default()),
        Some(raw) => raw
            .trim()
            .parse::<Timeframe>()
            .map_err(|err| invalid_field_error(TIMEFRAME, err)),
    }
}

/// Path segment holding a user email.
pub(crate) fn parse_path_user_id(raw: String) -> Result<UserId, Error> {
    parse_email(Some(raw), USER_ID)
}
