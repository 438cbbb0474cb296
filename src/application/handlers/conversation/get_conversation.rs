//! GetConversation query handler.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, UserId};
use crate::ports::{ConversationStore, StoreError};

/// Query for a single conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    /// Conversation to load.
    pub conversation_id: ConversationId,
    /// The requesting owner.
    pub owner: UserId,
}

impl GetConversationQuery {
    /// Creates a new query.
    pub fn new(conversation_id: ConversationId, owner: UserId) -> Self {
        Self {
            conversation_id,
            owner,
        }
    }
}

/// Errors that can occur when loading a conversation.
#[derive(Debug, Error)]
pub enum GetConversationError {
    /// Persistence failed (including corrupt stored state).
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for GetConversation queries.
pub struct GetConversationHandler<S: ConversationStore> {
    store: Arc<S>,
}

impl<S: ConversationStore> GetConversationHandler<S> {
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles the query. Absence is `None`, not an error.
    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<Option<Conversation>, GetConversationError> {
        Ok(self.store.get(&query.conversation_id, &query.owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::ConversationMetadata;

    fn owner() -> UserId {
        UserId::new("default_user").unwrap()
    }

    #[tokio::test]
    async fn returns_existing_conversation() {
        let store = Arc::new(InMemoryConversationStore::new());
        let created = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        let handler = GetConversationHandler::new(store);

        let found = handler
            .handle(GetConversationQuery::new(*created.id(), owner()))
            .await
            .unwrap();

        assert_eq!(found.unwrap().id(), created.id());
    }

    #[tokio::test]
    async fn absence_is_none_not_error() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = GetConversationHandler::new(store);

        let found = handler
            .handle(GetConversationQuery::new(ConversationId::new(), owner()))
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn other_owners_conversation_is_invisible() {
        let store = Arc::new(InMemoryConversationStore::new());
        let created = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        let handler = GetConversationHandler::new(store);

        let found = handler
            .handle(GetConversationQuery::new(
                *created.id(),
                UserId::new("someone_else").unwrap(),
            ))
            .await
            .unwrap();

        assert!(found.is_none());
    }
}
