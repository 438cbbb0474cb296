//! In-memory conversation store for tests and local development.
//!
//! A single async mutex guards the whole map, so every mutation is an atomic
//! read-modify-write and the concurrency contract of the port holds trivially.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::chat::BASE_SYSTEM_PROMPT;
use crate::domain::conversation::{
    Conversation, ConversationMetadata, ConversationSummary, Message, MessageMetadata, Role,
};
use crate::domain::foundation::{ConversationId, MessageId, UserId};
use crate::ports::{ConversationStore, StoreError};

/// Deterministic, non-durable store backed by a HashMap.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations (for tests).
    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    /// Returns true when no conversations are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(
        &self,
        owner: &UserId,
        metadata: ConversationMetadata,
    ) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new(owner.clone(), metadata, BASE_SYSTEM_PROMPT);
        let mut conversations = self.conversations.lock().await;
        conversations.insert(*conversation.id(), conversation.clone());
        Ok(conversation)
    }

    async fn get(
        &self,
        id: &ConversationId,
        owner: &UserId,
    ) -> Result<Option<Conversation>, StoreError> {
        let conversations = self.conversations.lock().await;
        Ok(conversations
            .get(id)
            .filter(|c| c.owner() == owner)
            .cloned())
    }

    async fn list(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationSummary>, StoreError> {
        let conversations = self.conversations.lock().await;
        let mut summaries: Vec<ConversationSummary> = conversations
            .values()
            .filter(|c| c.owner() == owner)
            .map(|c| c.summary())
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries.into_iter().skip(offset).take(limit).collect())
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        owner: &UserId,
        role: Role,
        content: &str,
        metadata: MessageMetadata,
    ) -> Result<Option<MessageId>, StoreError> {
        let mut conversations = self.conversations.lock().await;
        let Some(conversation) = conversations.get_mut(id).filter(|c| c.owner() == owner) else {
            return Ok(None);
        };

        let message = Message::new(role, content)
            .map_err(|e| StoreError::InvalidMessage(e.to_string()))?
            .with_metadata(metadata);
        Ok(Some(conversation.append(message)))
    }

    async fn delete(&self, id: &ConversationId, owner: &UserId) -> Result<bool, StoreError> {
        let mut conversations = self.conversations.lock().await;
        let owned = conversations.get(id).is_some_and(|c| c.owner() == owner);
        if owned {
            conversations.remove(id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new("default_user").unwrap()
    }

    fn other_owner() -> UserId {
        UserId::new("someone_else").unwrap()
    }

    #[tokio::test]
    async fn create_seeds_system_message() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        assert_eq!(conv.message_count(), 1);
        assert!(conv.messages()[0].is_system());
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = InMemoryConversationStore::new();
        let result = store.get(&ConversationId::new(), &owner()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn get_is_scoped_to_owner() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        let found = store.get(conv.id(), &owner()).await.unwrap();
        assert!(found.is_some());

        let hidden = store.get(conv.id(), &other_owner()).await.unwrap();
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn append_message_returns_none_for_unknown_conversation() {
        let store = InMemoryConversationStore::new();
        let result = store
            .append_message(
                &ConversationId::new(),
                &owner(),
                Role::User,
                "hello",
                MessageMetadata::new(),
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn append_message_rejects_empty_content() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        let result = store
            .append_message(conv.id(), &owner(), Role::User, "   ", MessageMetadata::new())
            .await;

        assert!(matches!(result, Err(StoreError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn round_trip_preserves_order_and_content() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        store
            .append_message(conv.id(), &owner(), Role::User, "question", MessageMetadata::new())
            .await
            .unwrap()
            .unwrap();
        store
            .append_message(conv.id(), &owner(), Role::Assistant, "answer", MessageMetadata::new())
            .await
            .unwrap()
            .unwrap();

        let loaded = store.get(conv.id(), &owner()).await.unwrap().unwrap();
        let contents: Vec<_> = loaded.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents[1..], ["question", "answer"]);
        assert!(loaded.messages()[1].created_at() <= loaded.messages()[2].created_at());
    }

    #[tokio::test]
    async fn list_orders_by_most_recent_update() {
        let store = InMemoryConversationStore::new();
        let first = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        let listed = store.list(&owner(), 10, 0).await.unwrap();
        assert_eq!(listed[0].id, *second.id());
        assert_eq!(listed[1].id, *first.id());

        // Appending to the older conversation moves it to the front.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .append_message(first.id(), &owner(), Role::User, "hello", MessageMetadata::new())
            .await
            .unwrap();
        let listed = store.list(&owner(), 10, 0).await.unwrap();
        assert_eq!(listed[0].id, *first.id());
    }

    #[tokio::test]
    async fn list_paginates_and_scopes_to_owner() {
        let store = InMemoryConversationStore::new();
        for _ in 0..5 {
            store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        }
        store.create(&other_owner(), ConversationMetadata::new()).await.unwrap();

        let page = store.list(&owner(), 2, 1).await.unwrap();
        assert_eq!(page.len(), 2);

        let all = store.list(&owner(), 100, 0).await.unwrap();
        assert_eq!(all.len(), 5);

        let unknown = store.list(&UserId::new("nobody").unwrap(), 10, 0).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        assert!(store.delete(conv.id(), &owner()).await.unwrap());
        assert!(!store.delete(conv.id(), &owner()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_respects_owner() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();

        assert!(!store.delete(conv.id(), &other_owner()).await.unwrap());
        assert!(store.get(conv.id(), &owner()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_appends_lose_nothing() {
        let store = std::sync::Arc::new(InMemoryConversationStore::new());
        let conv = store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        let id = *conv.id();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append_message(
                        &id,
                        &UserId::new("default_user").unwrap(),
                        Role::User,
                        &format!("message {}", i),
                        MessageMetadata::new(),
                    )
                    .await
                    .unwrap()
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.get(&id, &owner()).await.unwrap().unwrap();
        assert_eq!(loaded.message_count(), 21); // system message + 20 appends
    }
}
