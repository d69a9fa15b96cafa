//! Role-gated roster and department administration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{
    AdminCommand, CreateUserRequest, DepartmentRepository, PasswordHasher, PasswordReset,
    RemovedUser, UpdateUserRequest, UserRepository,
};
use super::service_support::{
    USER_NOT_FOUND, ensure_department_exists, ensure_email_free, map_department_error,
    map_hasher_error, map_user_error, roster_rule_error, settle_user_update,
    user_validation_error,
};
use super::{
    AvatarUrl, Capability, Department, DepartmentName, Error, Password, Role, User, UserId,
    authorize, check_deletion, check_role_change,
};

/// Administration service implementing the [`AdminCommand`] driving port.
#[derive(Clone)]
pub struct AdminService<U, D> {
    users: Arc<U>,
    departments: Arc<D>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, D> AdminService<U, D> {
    pub fn new(users: Arc<U>, departments: Arc<D>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            departments,
            hasher,
        }
    }
}

/// Role given to a staff-created account.
///
/// Only admins may choose; everyone else creates plain users.
fn granted_role(actor: &User, requested: Option<Role>) -> Role {
    if actor.role().permits(Capability::AssignRole) {
        requested.unwrap_or(Role::User)
    } else {
        Role::User
    }
}

#[async_trait]
impl<U, D> AdminCommand for AdminService<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    async fn list_users(&self, actor: &User) -> Result<Vec<User>, Error> {
        authorize(actor, Capability::ListUsers)?;
        self.users.list().await.map_err(map_user_error)
    }

    async fn create_user(&self, actor: &User, request: CreateUserRequest) -> Result<User, Error> {
        authorize(actor, Capability::CreateUser)?;
        let CreateUserRequest {
            name,
            email,
            password,
            department_id,
            role,
        } = request;

        email
            .ensure_corporate()
            .map_err(|err| user_validation_error("email", &err))?;
        ensure_email_free(self.users.as_ref(), &email).await?;
        ensure_department_exists(self.departments.as_ref(), &department_id).await?;

        let role = granted_role(actor, role);
        let hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let user = User::builder(email, name, department_id, hash)
            .avatar(AvatarUrl::random(&mut rand::thread_rng()))
            .role(role)
            .must_change_password(true)
            .build();
        self.users.insert(&user).await.map_err(map_user_error)?;

        info!(actor = %actor.id(), user = %user.id(), role = %role, "user created");
        Ok(user)
    }

    async fn create_department(
        &self,
        actor: &User,
        name: DepartmentName,
    ) -> Result<Department, Error> {
        authorize(actor, Capability::CreateDepartment)?;
        let department = Department::named(name);
        self.departments
            .insert(&department)
            .await
            .map_err(map_department_error)?;

        info!(
            actor = %actor.id(),
            department = %department.id(),
            "department created"
        );
        Ok(department)
    }

    async fn update_user(&self, actor: &User, request: UpdateUserRequest) -> Result<User, Error> {
        authorize(actor, Capability::UpdateUser)?;
        authorize(actor, Capability::AssignRole)?;
        let UpdateUserRequest {
            user_id,
            department_id,
            role,
        } = request;
        ensure_department_exists(self.departments.as_ref(), &department_id).await?;

        let actor_id = actor.id().clone();
        let outcome = self
            .users
            .update(&user_id, move |user, roster| {
                check_role_change(&actor_id, user, role, roster.admin_count)
                    .map_err(roster_rule_error)?;
                user.reassign(department_id, role);
                Ok(user.clone())
            })
            .await;

        match settle_user_update(outcome) {
            Ok(user) => {
                info!(
                    actor = %actor.id(),
                    user = %user.id(),
                    department = %user.department_id(),
                    role = %user.role(),
                    "user updated"
                );
                Ok(user)
            }
            Err(err) => {
                warn!(actor = %actor.id(), user = %user_id, error = %err, "user update rejected");
                Err(err)
            }
        }
    }

    async fn delete_user(&self, actor: &User, user_id: &UserId) -> Result<RemovedUser, Error> {
        authorize(actor, Capability::DeleteUser)?;
        check_deletion(actor.id(), user_id).map_err(|violation| {
            warn!(actor = %actor.id(), "self deletion refused");
            roster_rule_error(violation)
        })?;

        let removed = self
            .users
            .remove(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        info!(
            actor = %actor.id(),
            user = %user_id,
            department_messages = removed.department_messages,
            support_thread = removed.support_thread,
            "user deleted"
        );
        Ok(removed)
    }

    async fn reset_password(
        &self,
        actor: &User,
        user_id: &UserId,
    ) -> Result<PasswordReset, Error> {
        authorize(actor, Capability::ResetPassword)?;
        let temporary_password = Password::generate_temporary(&mut rand::thread_rng());
        let hash = self
            .hasher
            .hash(&temporary_password)
            .map_err(map_hasher_error)?;

        let outcome = self
            .users
            .update(user_id, move |user, _| {
                user.set_password_hash(hash, true);
                Ok(user.clone())
            })
            .await;
        let user = settle_user_update(outcome)?;

        info!(actor = %actor.id(), user = %user.id(), "password reset");
        Ok(PasswordReset {
            user,
            temporary_password,
        })
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
