//! Driving port resolving a session into the acting user.

use async_trait::async_trait;

use crate::domain::{Error, ResolvedSession, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the stored user id and view-as flag.
    ///
    /// Returns `Ok(None)` when the id no longer matches a stored user; the
    /// caller must then purge the session.
    async fn resolve(
        &self,
        user_id: &UserId,
        view_as_user: bool,
    ) -> Result<Option<ResolvedSession>, Error>;

    /// Whether `logged_in` may switch to the test-user view.
    fn may_switch_to_user_view(&self, logged_in: &User) -> bool;
}
