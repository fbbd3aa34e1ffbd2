//! The chat message value passed through the interception pipeline.

use super::{Attachment, MessageId, Metadata, PluginValue, Role};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A single message within a conversation.
///
/// Messages are immutable once created. Interceptors that need to change
/// what is sent build a replacement with [`Message::with_content`], which
/// keeps the identifier, role and timestamp of the original.
///
/// # Examples
///
/// ```
/// use aimate::conversation::domain::{Message, Role};
/// use mockable::DefaultClock;
///
/// let message = Message::user("Hello!", &DefaultClock);
/// let rewritten = message.with_content("[context]\n\nHello!");
///
/// assert_eq!(rewritten.id(), message.id());
/// assert_eq!(rewritten.role(), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    attachments: Vec<Attachment>,
    metadata: Metadata,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the clock's current time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            attachments: Vec::new(),
            metadata: Metadata::new(),
            created_at: clock.utc(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(Role::User, content, clock)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(Role::Assistant, content, clock)
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<PluginValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns a copy carrying different text but the same identity.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the author role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
