//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the step challenge and the
//! services that implement the driving ports. Types validate on
//! construction; services consult the capability table and talk to stores
//! only through ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, Role, StepCounts: the identity store's record.
//! - Department, DepartmentId: leaderboard teams.
//! - SupportThread, DepartmentMessage: messaging logs.
//! - AccountService, AdminService, MessagingService, LeaderboardService,
//!   SessionResolverService: driving port implementations.

pub mod account_service;
pub mod admin_service;
pub mod auth;
pub mod authorization;
pub mod department;
pub mod error;
pub mod leaderboard;
pub mod leaderboard_service;
pub mod messaging;
pub mod messaging_service;
pub mod password;
pub mod ports;
mod service_support;
pub mod session;
pub mod steps;
pub mod trace_id;
pub mod user;
pub mod verification;

pub use self::account_service::{AccountService, AccountSettings};
pub use self::admin_service::AdminService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::authorization::{
    Capability, RosterRuleViolation, UNAUTHORIZED_ACTION, authorize, check_deletion,
    check_role_change,
};
pub use self::department::{
    Department, DepartmentId, DepartmentName, DepartmentValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::leaderboard::{
    Dashboard, DepartmentStanding, DepartmentSummary, MemberStanding, Rival, Timeframe,
    UnknownTimeframe, rank_departments,
};
pub use self::leaderboard_service::LeaderboardService;
pub use self::messaging::{
    ADMIN_SENDER_NAME, AUTO_ACKNOWLEDGEMENT, DepartmentMessage, MESSAGE_MAX_CHARS,
    MessageContent, MessageValidationError, SupportMessage, SupportSender, SupportThread,
    triage_order,
};
pub use self::messaging_service::MessagingService;
pub use self::password::{
    PASSWORD_MIN_LENGTH, Password, PasswordChange, PasswordHash, PasswordPolicyError,
    TEMPORARY_PASSWORD_LENGTH,
};
pub use self::session::{
    DEFAULT_VIEW_ADMIN, DEFAULT_VIEW_TEST_USER, ResolvedSession, SessionResolverService,
    ViewOverride,
};
pub use self::steps::{CHALLENGE_TARGET_STEPS, DailySteps, StepCounts, StepUpdateError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AvatarUrl, CORPORATE_EMAIL_SUFFIX, DEFAULT_DAILY_GOAL, DisplayName, PREDEFINED_AVATARS, Role,
    User, UserBuilder, UserId, UserValidationError,
};
pub use self::verification::{
    DEFAULT_VERIFICATION_TTL, MalformedCode, PendingVerification, Redemption, VerificationCode,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use step_challenge::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
