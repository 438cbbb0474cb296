//! Message entity for conversations.
//!
//! Messages are immutable records of user/assistant exchanges within a conversation.
//! Each message has a role (user/assistant/system), content, timestamp, and a
//! free-form metadata map carrying response provenance.

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata attached to a message.
///
/// Carries the response strategy, whether retrieval ran, and provenance of the
/// best context snippet (source, chunk index, similarity score, relevance tier).
pub type MessageMetadata = BTreeMap<String, serde_json::Value>;

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System instructions (typically invisible to user).
    System,
    /// User input.
    User,
    /// AI assistant response.
    Assistant,
}

impl Role {
    /// Returns true if this is a user-visible role.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: Timestamp,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: MessageMetadata,
}

impl Message {
    /// Creates a new message with the given role and content.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is empty or whitespace only
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }

        Ok(Self {
            id: MessageId::new(),
            role,
            content,
            created_at: Timestamp::now(),
            metadata: MessageMetadata::new(),
        })
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::Assistant, content)
    }

    /// Attaches metadata to the message, replacing any existing map.
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        role: Role,
        content: String,
        created_at: Timestamp,
        metadata: MessageMetadata,
    ) -> Self {
        Self {
            id,
            role,
            content,
            created_at,
            metadata,
        }
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the metadata map.
    pub fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this message is from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Returns true if this is the system message.
    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}
