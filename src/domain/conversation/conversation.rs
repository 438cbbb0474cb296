//! Conversation aggregate: a durable, append-only log of messages.
//!
//! A conversation is owned by exactly one user and is only ever mutated by
//! appending messages. The first message is always a system-role message
//! establishing behavior constraints; it is seeded at construction.

use crate::domain::foundation::{ConversationId, MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::message::{Message, Role};

/// Free-form conversation metadata (title and similar attributes).
pub type ConversationMetadata = BTreeMap<String, String>;

/// A conversation between one user and the assistant.
///
/// # Invariants
///
/// - Messages are strictly ordered by append time
/// - Appended messages are never edited or removed
/// - `updated_at` tracks the latest append
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    owner: UserId,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default)]
    metadata: ConversationMetadata,
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates a new conversation seeded with the given system message.
    pub fn new(owner: UserId, metadata: ConversationMetadata, system_prompt: &str) -> Self {
        let created_at = Timestamp::now();
        let system_message = Message::reconstitute(
            MessageId::new(),
            Role::System,
            system_prompt.to_string(),
            created_at,
            Default::default(),
        );

        Self {
            id: ConversationId::new(),
            owner,
            created_at,
            updated_at: created_at,
            metadata,
            messages: vec![system_message],
        }
    }

    /// Appends a message, returning its id and bumping `updated_at`.
    pub fn append(&mut self, message: Message) -> MessageId {
        let id = *message.id();
        self.updated_at = *message.created_at();
        self.messages.push(message);
        id
    }

    /// Returns the conversation ID.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns when the conversation was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the conversation was last appended to.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns the metadata map.
    pub fn metadata(&self) -> &ConversationMetadata {
        &self.metadata
    }

    /// Returns the title, if one was set.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }

    /// Returns all messages in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages, including the system message.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the most recently appended message.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Finds a message by id.
    pub fn find_message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    /// Returns the last `limit` non-system messages, oldest first.
    ///
    /// Used to build the classification history window.
    pub fn recent_dialogue(&self, limit: usize) -> Vec<&Message> {
        let dialogue: Vec<&Message> = self.messages.iter().filter(|m| !m.is_system()).collect();
        let skip = dialogue.len().saturating_sub(limit);
        dialogue.into_iter().skip(skip).collect()
    }

    /// Produces a summary view for listings.
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            message_count: self.messages.len(),
            last_message: self.messages.last().cloned(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Summary of a conversation for paginated listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: ConversationId,
    /// When the conversation was created.
    pub created_at: Timestamp,
    /// When the conversation was last appended to.
    pub updated_at: Timestamp,
    /// Total message count, including the system message.
    pub message_count: usize,
    /// The most recent message, if any beyond creation exists.
    pub last_message: Option<Message>,
    /// Conversation metadata (title, etc.).
    pub metadata: ConversationMetadata,
}
