//! Conversation store port - durable, append-only conversation persistence.
//!
//! The store owns identity allocation for conversations and messages. Absence
//! is a sentinel (`None` / `false`), never an error; corrupt stored state is an
//! error, never silently treated as absence.
//!
//! # Concurrency contract
//!
//! Every mutating operation is a read-modify-write over the whole conversation
//! object. Implementations must serialize mutations per conversation id so that
//! concurrent appends can never lose an update.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{
    Conversation, ConversationMetadata, ConversationSummary, MessageMetadata, Role,
};
use crate::domain::foundation::{ConversationId, MessageId, UserId};

/// Repository port for conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a conversation seeded with the behavior-constraint system message.
    async fn create(
        &self,
        owner: &UserId,
        metadata: ConversationMetadata,
    ) -> Result<Conversation, StoreError>;

    /// Loads a conversation by id, scoped to its owner.
    ///
    /// Returns `None` when absent. A deserialization failure surfaces as an
    /// error; a conversation is never partially constructed.
    async fn get(
        &self,
        id: &ConversationId,
        owner: &UserId,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Lists conversation summaries, most recently updated first.
    ///
    /// An unknown owner yields an empty vec.
    async fn list(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationSummary>, StoreError>;

    /// Appends a message, persisting the full conversation atomically.
    ///
    /// Returns `None` when the conversation does not exist; never creates one
    /// as a side effect.
    async fn append_message(
        &self,
        id: &ConversationId,
        owner: &UserId,
        role: Role,
        content: &str,
        metadata: MessageMetadata,
    ) -> Result<Option<MessageId>, StoreError>;

    /// Deletes a conversation. Idempotent; returns `false` when absent.
    async fn delete(&self, id: &ConversationId, owner: &UserId) -> Result<bool, StoreError>;
}

/// Persistence errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Failed to serialize a conversation for persistence.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Stored state could not be deserialized (corrupt record).
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The message to append was invalid (e.g. empty content).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl StoreError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ConversationStore) {}
    }

    #[test]
    fn errors_display_their_detail() {
        let err = StoreError::io("disk full");
        assert_eq!(err.to_string(), "storage I/O error: disk full");

        let err = StoreError::deserialization("unexpected end of input");
        assert_eq!(err.to_string(), "deserialization failed: unexpected end of input");
    }
}
