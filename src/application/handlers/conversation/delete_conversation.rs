//! DeleteConversation command handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{ConversationId, UserId};
use crate::ports::{ConversationStore, StoreError};

/// Command to delete a conversation.
#[derive(Debug, Clone)]
pub struct DeleteConversationCommand {
    /// Conversation to delete.
    pub conversation_id: ConversationId,
    /// The requesting owner.
    pub owner: UserId,
}

impl DeleteConversationCommand {
    /// Creates a new command.
    pub fn new(conversation_id: ConversationId, owner: UserId) -> Self {
        Self {
            conversation_id,
            owner,
        }
    }
}

/// Errors that can occur when deleting a conversation.
#[derive(Debug, Error)]
pub enum DeleteConversationError {
    /// Persistence failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for DeleteConversation commands.
pub struct DeleteConversationHandler<S: ConversationStore> {
    store: Arc<S>,
}

impl<S: ConversationStore> DeleteConversationHandler<S> {
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles the command. Idempotent; returns `false` when absent.
    pub async fn handle(
        &self,
        cmd: DeleteConversationCommand,
    ) -> Result<bool, DeleteConversationError> {
        let deleted = self.store.delete(&cmd.conversation_id, &cmd.owner).await?;
        if deleted {
            info!(conversation_id = %cmd.conversation_id, "conversation deleted");
        }
        Ok(deleted)
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
    async fn deletes_and_reports_true() {
        let store = Arc::new(InMemoryConversationStore::new());
        let created = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        let handler = DeleteConversationHandler::new(Arc::clone(&store));

        let deleted = handler
            .handle(DeleteConversationCommand::new(*created.id(), owner()))
            .await
            .unwrap();

        assert!(deleted);
        assert!(store.get(created.id(), &owner()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_twice_reports_false() {
        let store = Arc::new(InMemoryConversationStore::new());
        let created = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        let handler = DeleteConversationHandler::new(store);

        let cmd = DeleteConversationCommand::new(*created.id(), owner());
        assert!(handler.handle(cmd.clone()).await.unwrap());
        assert!(!handler.handle(cmd).await.unwrap());
    }
}
