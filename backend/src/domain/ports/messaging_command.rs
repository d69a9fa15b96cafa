//! Driving port for department chat and the support desk.

use async_trait::async_trait;

use crate::domain::{
    AvatarUrl, DepartmentId, DepartmentMessage, DisplayName, Error, MessageContent,
    SupportThread, User, UserId,
};

/// A department message with its sender's current profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentMessageView {
    pub message: DepartmentMessage,
    pub sender_name: DisplayName,
    pub sender_avatar: AvatarUrl,
}

/// A support thread with its owner's current profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportThreadView {
    pub thread: SupportThread,
    pub user_name: DisplayName,
    pub user_avatar: AvatarUrl,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingCommand: Send + Sync {
    /// Read the caller's own department channel.
    async fn department_messages(
        &self,
        actor: &User,
        department_id: &DepartmentId,
    ) -> Result<Vec<DepartmentMessageView>, Error>;

    /// Post to the caller's own department channel.
    async fn send_department_message(
        &self,
        actor: &User,
        department_id: &DepartmentId,
        content: MessageContent,
    ) -> Result<DepartmentMessageView, Error>;

    /// Open (creating if needed) the caller's thread and mark replies read.
    async fn support_thread(&self, actor: &User) -> Result<SupportThreadView, Error>;

    /// Post to the caller's thread.
    async fn send_support_message(
        &self,
        actor: &User,
        content: MessageContent,
    ) -> Result<SupportThreadView, Error>;

    /// All threads in triage order.
    async fn all_support_threads(&self, actor: &User) -> Result<Vec<SupportThreadView>, Error>;

    /// Staff reply to an existing thread.
    async fn reply_to_support_thread(
        &self,
        actor: &User,
        user_id: &UserId,
        content: MessageContent,
    ) -> Result<SupportThreadView, Error>;
}
