//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod admin_command;
mod department_message_repository;
mod department_repository;
mod leaderboard_query;
mod messaging_command;
mod password_hasher;
mod pending_verification_repository;
mod session_resolver;
mod support_thread_repository;
mod user_repository;
mod verification_notifier;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, PendingSignup, SignupRequest, VerifyEmailRequest};
#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use admin_command::{AdminCommand, CreateUserRequest, PasswordReset, UpdateUserRequest};
pub use department_message_repository::{
    DepartmentMessagePersistenceError, DepartmentMessageRepository,
};
pub use department_repository::{DepartmentPersistenceError, DepartmentRepository};
#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
pub use leaderboard_query::LeaderboardQuery;
#[cfg(test)]
pub use messaging_command::MockMessagingCommand;
pub use messaging_command::{DepartmentMessageView, MessagingCommand, SupportThreadView};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use pending_verification_repository::{
    PendingVerificationPersistenceError, PendingVerificationRepository,
};
#[cfg(test)]
pub use session_resolver::MockSessionResolver;
pub use session_resolver::SessionResolver;
pub use support_thread_repository::{SupportThreadPersistenceError, SupportThreadRepository};
pub use user_repository::{RemovedUser, RosterSnapshot, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use verification_notifier::MockVerificationNotifier;
pub use verification_notifier::{
    RecordingVerificationNotifier, VerificationNotifier, VerificationNotifierError,
};
