//! Department chat and support-desk threads.
//!
//! Both logs are append-only. A support thread belongs to exactly one user
//! and carries two unread flags, one per audience.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::department::DepartmentId;
use super::user::{DisplayName, UserId};

/// Maximum message length, in characters.
pub const MESSAGE_MAX_CHARS: usize = 2_000;

/// Display name used for replies from staff and the auto-acknowledgment.
pub const ADMIN_SENDER_NAME: &str = "Admin";

/// Canned reply appended after a user's first support message.
pub const AUTO_ACKNOWLEDGEMENT: &str =
    "Thanks for reaching out! An administrator will contact you shortly.";

/// Validation failures for message content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("Message content cannot be empty.")]
    Empty,
    #[error("Message content must be at most {max} characters.")]
    TooLong { max: usize },
}

/// Trimmed, non-empty message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, MessageValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MessageValidationError::Empty);
        }
        if trimmed.chars().count() > MESSAGE_MAX_CHARS {
            return Err(MessageValidationError::TooLong {
                max: MESSAGE_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = MessageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A message posted to a department channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentMessage {
    id: Uuid,
    sender_id: UserId,
    department_id: DepartmentId,
    content: MessageContent,
    timestamp: DateTime<Utc>,
}

impl DepartmentMessage {
    pub fn new(
        sender_id: UserId,
        department_id: DepartmentId,
        content: MessageContent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            department_id,
            content,
            timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    pub fn department_id(&self) -> &DepartmentId {
        &self.department_id
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Author of a support message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupportSender {
    /// The thread owner.
    User(UserId),
    /// Any staff member, shown as a single sentinel identity.
    Admin,
}

impl SupportSender {
    /// Wire identifier: the user's email or `admin`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(id) => id.as_ref(),
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for SupportSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a support thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportMessage {
    id: Uuid,
    sender: SupportSender,
    sender_name: String,
    content: MessageContent,
    timestamp: DateTime<Utc>,
}

impl SupportMessage {
    fn new(
        sender: SupportSender,
        sender_name: String,
        content: MessageContent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            sender_name,
            content,
            timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sender(&self) -> &SupportSender {
        &self.sender
    }

    pub fn sender_name(&self) -> &str {
        self.sender_name.as_str()
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Per-user support conversation.
///
/// ## Invariants
/// - At most one thread exists per user.
/// - `has_unread_admin_messages`: the owner has staff replies to read.
/// - `has_unread_user_messages`: staff have owner messages to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportThread {
    user_id: UserId,
    messages: Vec<SupportMessage>,
    has_unread_admin_messages: bool,
    has_unread_user_messages: bool,
}

impl SupportThread {
    /// Empty thread with both flags cleared.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            messages: Vec::new(),
            has_unread_admin_messages: false,
            has_unread_user_messages: false,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn messages(&self) -> &[SupportMessage] {
        &self.messages
    }

    pub fn has_unread_admin_messages(&self) -> bool {
        self.has_unread_admin_messages
    }

    pub fn has_unread_user_messages(&self) -> bool {
        self.has_unread_user_messages
    }

    /// Timestamp of the newest entry.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(SupportMessage::timestamp)
    }

    /// The owner opened the thread.
    pub fn mark_viewed_by_user(&mut self) {
        self.has_unread_admin_messages = false;
    }

    /// Append a message from the owner.
    ///
    /// If the owner had not written before, the canned acknowledgment follows
    /// one second after the message so it always sorts after it.
    pub fn post_from_user(
        &mut self,
        sender_name: &DisplayName,
        content: MessageContent,
        now: DateTime<Utc>,
    ) {
        let first_from_user = !self
            .messages
            .iter()
            .any(|m| matches!(m.sender(), SupportSender::User(_)));
        self.messages.push(SupportMessage::new(
            SupportSender::User(self.user_id.clone()),
            sender_name.to_string(),
            content,
            now,
        ));
        self.has_unread_user_messages = true;

        if first_from_user {
            let ack_at = now
                .checked_add_signed(chrono::Duration::seconds(1))
                .unwrap_or(now);
            self.messages.push(SupportMessage::new(
                SupportSender::Admin,
                ADMIN_SENDER_NAME.to_owned(),
                MessageContent(AUTO_ACKNOWLEDGEMENT.to_owned()),
                ack_at,
            ));
        }
    }

    /// Append a staff reply.
    pub fn post_from_admin(&mut self, content: MessageContent, now: DateTime<Utc>) {
        self.messages.push(SupportMessage::new(
            SupportSender::Admin,
            ADMIN_SENDER_NAME.to_owned(),
            content,
            now,
        ));
        self.has_unread_admin_messages = true;
        self.has_unread_user_messages = false;
    }
}

/// Staff triage order: unread first, then most recent activity.
pub fn triage_order(a: &SupportThread, b: &SupportThread) -> Ordering {
    b.has_unread_user_messages
        .cmp(&a.has_unread_user_messages)
        .then_with(|| b.last_activity().cmp(&a.last_activity()))
}
