//! Driving port for role-gated administration.
//!
//! Every operation takes the acting user as resolved from the session and
//! checks the capability table before touching a store.

use async_trait::async_trait;

use crate::domain::{
    Department, DepartmentId, DepartmentName, DisplayName, Error, Password, Role, User, UserId,
};

use super::RemovedUser;

/// Account created by staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: DisplayName,
    pub email: UserId,
    pub password: Password,
    pub department_id: DepartmentId,
    /// Ignored for managers, who always create `user` accounts.
    pub role: Option<Role>,
}

/// Department and role change for an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub user_id: UserId,
    pub department_id: DepartmentId,
    pub role: Role,
}

/// Result of an admin password reset. The temporary password is only
/// available here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub user: User,
    pub temporary_password: Password,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Full roster for the management screen.
    async fn list_users(&self, actor: &User) -> Result<Vec<User>, Error>;

    async fn create_user(&self, actor: &User, request: CreateUserRequest) -> Result<User, Error>;

    async fn create_department(
        &self,
        actor: &User,
        name: DepartmentName,
    ) -> Result<Department, Error>;

    async fn update_user(&self, actor: &User, request: UpdateUserRequest) -> Result<User, Error>;

    /// Delete a user and cascade their messages and support thread.
    async fn delete_user(&self, actor: &User, user_id: &UserId) -> Result<RemovedUser, Error>;

    async fn reset_password(&self, actor: &User, user_id: &UserId)
    -> Result<PasswordReset, Error>;
}
