//! Role capability table.
//!
//! Every mutating service operation asks this module, using the role
//! re-derived from the resolved session. Roles supplied by clients are never
//! consulted.

use serde_json::json;
use tracing::warn;

use super::user::{Role, User, UserId};
use super::Error;

/// Generic message returned for role failures.
pub const UNAUTHORIZED_ACTION: &str = "Unauthorized action.";

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateUser,
    AssignRole,
    UpdateUser,
    DeleteUser,
    CreateDepartment,
    ResetPassword,
    ListUsers,
    ReadAllSupportThreads,
    ReplyToSupport,
}

impl Capability {
    /// Stable name used in logs and error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::AssignRole => "assign_role",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::CreateDepartment => "create_department",
            Self::ResetPassword => "reset_password",
            Self::ListUsers => "list_users",
            Self::ReadAllSupportThreads => "read_all_support_threads",
            Self::ReplyToSupport => "reply_to_support",
        }
    }
}

impl Role {
    /// Whether this role holds `capability`.
    pub fn permits(self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => matches!(
                capability,
                Capability::CreateUser
                    | Capability::ListUsers
                    | Capability::ReadAllSupportThreads
                    | Capability::ReplyToSupport
            ),
            Role::User => false,
        }
    }
}

/// Fail with `forbidden` unless `actor` holds `capability`.
pub fn authorize(actor: &User, capability: Capability) -> Result<(), Error> {
    if actor.role().permits(capability) {
        return Ok(());
    }
    warn!(
        actor = %actor.id(),
        role = %actor.role(),
        capability = capability.as_str(),
        "capability denied"
    );
    Err(Error::forbidden(UNAUTHORIZED_ACTION)
        .with_details(json!({ "capability": capability.as_str() })))
}

/// Reasons an admin roster change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RosterRuleViolation {
    #[error("Cannot remove the last admin account.")]
    LastAdmin,
    #[error("Admins cannot delete their own account.")]
    SelfDeletion,
}

/// Last-admin rule for role changes.
///
/// Only a self-demotion is checked: an admin moving their own account away
/// from `admin` while `admin_count <= 1` is refused. Demoting someone else,
/// or self while other admins exist, is allowed.
pub fn check_role_change(
    actor: &UserId,
    target: &User,
    new_role: Role,
    admin_count: usize,
) -> Result<(), RosterRuleViolation> {
    let self_demotion =
        target.id() == actor && target.role() == Role::Admin && new_role != Role::Admin;
    if self_demotion && admin_count <= 1 {
        return Err(RosterRuleViolation::LastAdmin);
    }
    Ok(())
}

/// Admins may delete anyone but themselves.
pub fn check_deletion(actor: &UserId, target: &UserId) -> Result<(), RosterRuleViolation> {
    if actor == target {
        Err(RosterRuleViolation::SelfDeletion)
    } else {
        Ok(())
    }
}
