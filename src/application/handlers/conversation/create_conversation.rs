//! CreateConversation command handler.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::domain::conversation::{Conversation, ConversationMetadata};
use crate::domain::foundation::UserId;
use crate::ports::{ConversationStore, StoreError};

/// Command to create a conversation.
#[derive(Debug, Clone)]
pub struct CreateConversationCommand {
    /// The owning user.
    pub owner: UserId,
    /// Optional conversation title.
    pub title: Option<String>,
}

impl CreateConversationCommand {
    /// Creates a new command.
    pub fn new(owner: UserId, title: Option<String>) -> Self {
        Self { owner, title }
    }
}

/// Errors that can occur when creating a conversation.
#[derive(Debug, Error)]
pub enum CreateConversationError {
    /// Persistence failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for CreateConversation commands.
pub struct CreateConversationHandler<S: ConversationStore> {
    store: Arc<S>,
}

impl<S: ConversationStore> CreateConversationHandler<S> {
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles a create conversation command.
    pub async fn handle(
        &self,
        cmd: CreateConversationCommand,
    ) -> Result<Conversation, CreateConversationError> {
        let title = cmd
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Conversation {}", Utc::now().format("%Y-%m-%d %H:%M")));

        let mut metadata = ConversationMetadata::new();
        metadata.insert("title".to_string(), title);

        let conversation = self.store.create(&cmd.owner, metadata).await?;
        info!(
            conversation_id = %conversation.id(),
            owner = %conversation.owner(),
            title = conversation.title(),
            "conversation created"
        );

        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;

    fn owner() -> UserId {
        UserId::new("default_user").unwrap()
    }

    #[tokio::test]
    async fn uses_the_given_title() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = CreateConversationHandler::new(store);

        let conversation = handler
            .handle(CreateConversationCommand::new(
                owner(),
                Some("Vacation policy".to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(conversation.title(), Some("Vacation policy"));
    }

    #[tokio::test]
    async fn generates_a_dated_default_title() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = CreateConversationHandler::new(store);

        let conversation = handler
            .handle(CreateConversationCommand::new(owner(), None))
            .await
            .unwrap();

        let title = conversation.title().unwrap();
        assert!(title.starts_with("Conversation "));
        let year = Utc::now().format("%Y").to_string();
        assert!(title.contains(&year));
    }

    #[tokio::test]
    async fn blank_title_falls_back_to_default() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = CreateConversationHandler::new(store);

        let conversation = handler
            .handle(CreateConversationCommand::new(owner(), Some("   ".to_string())))
            .await
            .unwrap();

        assert!(conversation.title().unwrap().starts_with("Conversation "));
    }

    #[tokio::test]
    async fn created_conversation_is_persisted() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = CreateConversationHandler::new(Arc::clone(&store));

        let conversation = handler
            .handle(CreateConversationCommand::new(owner(), None))
            .await
            .unwrap();

        let loaded = store.get(conversation.id(), &owner()).await.unwrap();
        assert!(loaded.is_some());
    }
}
