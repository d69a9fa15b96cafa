//! Department chat and the support desk.
//!
//! Department channels are scoped to the caller's own department. Support
//! threads are created lazily, one per user; staff see every thread in
//! triage order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use super::ports::{
    DepartmentMessageRepository, DepartmentMessageView, MessagingCommand, SupportThreadRepository,
    SupportThreadView, UserRepository,
};
use super::service_support::{USER_NOT_FOUND, map_message_error, map_thread_error, map_user_error};
use super::{
    Capability, DepartmentId, DepartmentMessage, Error, MessageContent, SupportThread, User,
    UserId, authorize, triage_order,
};

const FOREIGN_CHANNEL_READ: &str = "Unauthorized";
const FOREIGN_CHANNEL_SEND: &str = "You can only send messages to your own department.";
const THREAD_NOT_FOUND: &str = "Support thread not found.";

/// Messaging service implementing the [`MessagingCommand`] driving port.
#[derive(Clone)]
pub struct MessagingService<U, M, T> {
    users: Arc<U>,
    messages: Arc<M>,
    threads: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, M, T> MessagingService<U, M, T> {
    pub fn new(users: Arc<U>, messages: Arc<M>, threads: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            messages,
            threads,
            clock,
        }
    }
}

fn own_thread_view(actor: &User, thread: SupportThread) -> SupportThreadView {
    SupportThreadView {
        thread,
        user_name: actor.name().clone(),
        user_avatar: actor.avatar().clone(),
    }
}

fn ensure_own_department(
    actor: &User,
    department_id: &DepartmentId,
    message: &str,
) -> Result<(), Error> {
    if actor.department_id() == department_id {
        return Ok(());
    }
    warn!(
        actor = %actor.id(),
        department = %department_id,
        "foreign department channel refused"
    );
    Err(Error::forbidden(message).with_details(json!({
        "code": "foreign_department",
        "departmentId": department_id.as_ref(),
    })))
}

impl<U, M, T> MessagingService<U, M, T>
where
    U: UserRepository,
{
    async fn profiles(&self) -> Result<HashMap<UserId, User>, Error> {
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok(users
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect())
    }
}

#[async_trait]
impl<U, M, T> MessagingCommand for MessagingService<U, M, T>
where
    U: UserRepository,
    M: DepartmentMessageRepository,
    T: SupportThreadRepository,
{
    async fn department_messages(
        &self,
        actor: &User,
        department_id: &DepartmentId,
    ) -> Result<Vec<DepartmentMessageView>, Error> {
        ensure_own_department(actor, department_id, FOREIGN_CHANNEL_READ)?;
        let messages = self
            .messages
            .list_for_department(department_id)
            .await
            .map_err(map_message_error)?;
        let profiles = self.profiles().await?;

        Ok(messages
            .into_iter()
            .filter_map(|message| {
                let Some(sender) = profiles.get(message.sender_id()) else {
                    debug!(sender = %message.sender_id(), "message from unknown sender skipped");
                    return None;
                };
                Some(DepartmentMessageView {
                    sender_name: sender.name().clone(),
                    sender_avatar: sender.avatar().clone(),
                    message,
                })
            })
            .collect())
    }

    async fn send_department_message(
        &self,
        actor: &User,
        department_id: &DepartmentId,
        content: MessageContent,
    ) -> Result<DepartmentMessageView, Error> {
        ensure_own_department(actor, department_id, FOREIGN_CHANNEL_SEND)?;
        let message = DepartmentMessage::new(
            actor.id().clone(),
            department_id.clone(),
            content,
            self.clock.utc(),
        );
        self.messages
            .append(&message)
            .await
            .map_err(map_message_error)?;

        info!(actor = %actor.id(), department = %department_id, "department message sent");
        Ok(DepartmentMessageView {
            message,
            sender_name: actor.name().clone(),
            sender_avatar: actor.avatar().clone(),
        })
    }

    async fn support_thread(&self, actor: &User) -> Result<SupportThreadView, Error> {
        let thread = self
            .threads
            .upsert_with(actor.id(), |thread| {
                thread.mark_viewed_by_user();
                thread.clone()
            })
            .await
            .map_err(map_thread_error)?;
        Ok(own_thread_view(actor, thread))
    }

    async fn send_support_message(
        &self,
        actor: &User,
        content: MessageContent,
    ) -> Result<SupportThreadView, Error> {
        let now = self.clock.utc();
        let name = actor.name();
        let thread = self
            .threads
            .upsert_with(actor.id(), move |thread| {
                thread.post_from_user(name, content, now);
                thread.clone()
            })
            .await
            .map_err(map_thread_error)?;

        info!(
            actor = %actor.id(),
            messages = thread.messages().len(),
            "support message sent"
        );
        Ok(own_thread_view(actor, thread))
    }

    async fn all_support_threads(&self, actor: &User) -> Result<Vec<SupportThreadView>, Error> {
        authorize(actor, Capability::ReadAllSupportThreads)?;
        let mut threads = self.threads.list().await.map_err(map_thread_error)?;
        threads.sort_by(triage_order);
        let profiles = self.profiles().await?;

        Ok(threads
            .into_iter()
            .filter_map(|thread| {
                let Some(owner) = profiles.get(thread.user_id()) else {
                    debug!(owner = %thread.user_id(), "thread of unknown user skipped");
                    return None;
                };
                Some(SupportThreadView {
                    user_name: owner.name().clone(),
                    user_avatar: owner.avatar().clone(),
                    thread,
                })
            })
            .collect())
    }

    async fn reply_to_support_thread(
        &self,
        actor: &User,
        user_id: &UserId,
        content: MessageContent,
    ) -> Result<SupportThreadView, Error> {
        authorize(actor, Capability::ReplyToSupport)?;
        let now = self.clock.utc();
        let thread = self
            .threads
            .update_existing(user_id, move |thread| {
                thread.post_from_admin(content, now);
                thread.clone()
            })
            .await
            .map_err(map_thread_error)?
            .ok_or_else(|| Error::not_found(THREAD_NOT_FOUND))?;
        let owner = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        info!(actor = %actor.id(), user = %user_id, "support reply sent");
        Ok(SupportThreadView {
            thread,
            user_name: owner.name().clone(),
            user_avatar: owner.avatar().clone(),
        })
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
