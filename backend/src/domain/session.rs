//! Session resolution and the admin view override.
//!
//! The inbound adapter stores only the logged-in user id and a view-as flag.
//! Every request re-resolves them against the identity store so roles and
//! existence are never taken from the client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{SessionResolver, UserRepository};
use super::service_support::map_user_error;
use super::{Error, User, UserId};

/// Default admin identity allowed to use the view override.
pub const DEFAULT_VIEW_ADMIN: &str = "babken.egoian@dhs.lacounty.gov";

/// Default identity the admin switches to.
pub const DEFAULT_VIEW_TEST_USER: &str = "brianna.smith@dhs.lacounty.gov";

/// The single admin-to-test-user override pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOverride {
    admin: UserId,
    test_user: UserId,
}

impl ViewOverride {
    pub fn new(admin: UserId, test_user: UserId) -> Self {
        Self { admin, test_user }
    }

    pub fn admin(&self) -> &UserId {
        &self.admin
    }

    pub fn test_user(&self) -> &UserId {
        &self.test_user
    }
}

/// Active identity for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// User the request acts as.
    pub current: User,
    /// The logged-in admin while the view override is active.
    pub original: Option<User>,
}

impl ResolvedSession {
    /// Whether the view override is active.
    pub fn is_viewing_as_user(&self) -> bool {
        self.original.is_some()
    }

    /// The user who actually logged in.
    pub fn logged_in(&self) -> &User {
        self.original.as_ref().unwrap_or(&self.current)
    }
}

/// Session resolver backed by the identity store.
#[derive(Clone)]
pub struct SessionResolverService<U> {
    users: Arc<U>,
    view_override: ViewOverride,
}

impl<U> SessionResolverService<U> {
    pub fn new(users: Arc<U>, view_override: ViewOverride) -> Self {
        Self {
            users,
            view_override,
        }
    }
}

impl<U: UserRepository> SessionResolverService<U> {
    async fn find(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U: UserRepository> SessionResolver for SessionResolverService<U> {
    async fn resolve(
        &self,
        user_id: &UserId,
        view_as_user: bool,
    ) -> Result<Option<ResolvedSession>, Error> {
        let Some(logged_in) = self.find(user_id).await? else {
            debug!(user = %user_id, "session refers to a missing user");
            return Ok(None);
        };

        if view_as_user && self.may_switch_to_user_view(&logged_in) {
            if let Some(test_user) = self.find(self.view_override.test_user()).await? {
                return Ok(Some(ResolvedSession {
                    current: test_user,
                    original: Some(logged_in),
                }));
            }
        }

        Ok(Some(ResolvedSession {
            current: logged_in,
            original: None,
        }))
    }

    fn may_switch_to_user_view(&self, logged_in: &User) -> bool {
        logged_in.id() == self.view_override.admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DepartmentId, DisplayName, PasswordHash, Role};
    use crate::outbound::memory::InMemoryStore;
    use rstest::rstest;

    fn user(email: &str, role: Role) -> User {
        User::builder(
            UserId::new(email).expect("valid id"),
            DisplayName::new("Someone").expect("valid name"),
            DepartmentId::new("eng").expect("valid department"),
            PasswordHash::from_phc("$argon2id$stub"),
        )
        .role(role)
        .build()
    }

    async fn resolver(with_test_user: bool) -> SessionResolverService<InMemoryStore> {
        let store = Arc::new(InMemoryStore::default());
        store
            .insert(&user(DEFAULT_VIEW_ADMIN, Role::Admin))
            .await
            .expect("insert admin");
        store
            .insert(&user("other.admin@dhs.lacounty.gov", Role::Admin))
            .await
            .expect("insert other admin");
        if with_test_user {
            store
                .insert(&user(DEFAULT_VIEW_TEST_USER, Role::User))
                .await
                .expect("insert test user");
        }
        SessionResolverService::new(
            store,
            ViewOverride::new(
                UserId::new(DEFAULT_VIEW_ADMIN).expect("valid id"),
                UserId::new(DEFAULT_VIEW_TEST_USER).expect("valid id"),
            ),
        )
    }

    fn id(raw: &str) -> UserId {
        UserId::new(raw).expect("valid id")
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_resolves_to_no_session() {
        let resolver = resolver(true).await;
        let resolved = resolver
            .resolve(&id("deleted@dhs.lacounty.gov"), false)
            .await
            .expect("resolution succeeds");
        assert!(resolved.is_none());
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn designated_admin_switches_only_when_flagged(#[case] view_as_user: bool) {
        let resolver = resolver(true).await;
        let resolved = resolver
            .resolve(&id(DEFAULT_VIEW_ADMIN), view_as_user)
            .await
            .expect("resolution succeeds")
            .expect("session present");

        if view_as_user {
            assert_eq!(resolved.current.id().as_ref(), DEFAULT_VIEW_TEST_USER);
            assert_eq!(
                resolved.original.as_ref().map(|u| u.id().as_ref()),
                Some(DEFAULT_VIEW_ADMIN)
            );
            assert_eq!(resolved.logged_in().id().as_ref(), DEFAULT_VIEW_ADMIN);
        } else {
            assert_eq!(resolved.current.id().as_ref(), DEFAULT_VIEW_ADMIN);
            assert!(!resolved.is_viewing_as_user());
        }
    }

    #[rstest]
    #[tokio::test]
    async fn other_admins_cannot_use_the_override() {
        let resolver = resolver(true).await;
        let resolved = resolver
            .resolve(&id("other.admin@dhs.lacounty.gov"), true)
            .await
            .expect("resolution succeeds")
            .expect("session present");
        assert_eq!(resolved.current.id().as_ref(), "other.admin@dhs.lacounty.gov");
        assert!(resolved.original.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_test_user_falls_back_to_admin() {
        let resolver = resolver(false).await;
        let resolved = resolver
            .resolve(&id(DEFAULT_VIEW_ADMIN), true)
            .await
            .expect("resolution succeeds")
            .expect("session present");
        assert_eq!(resolved.current.id().as_ref(), DEFAULT_VIEW_ADMIN);
        assert!(resolved.original.is_none());
    }
}
