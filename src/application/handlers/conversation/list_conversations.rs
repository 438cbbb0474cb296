//! ListConversations query handler.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::ConversationSummary;
use crate::domain::foundation::UserId;
use crate::ports::{ConversationStore, StoreError};

/// Default page size when none is requested.
pub const DEFAULT_LIMIT: usize = 10;

/// Maximum page size accepted from callers.
pub const MAX_LIMIT: usize = 100;

/// Query for a page of conversation summaries.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    /// The requesting owner.
    pub owner: UserId,
    /// Page size.
    pub limit: usize,
    /// Number of summaries to skip.
    pub offset: usize,
}

impl ListConversationsQuery {
    /// Creates a query with explicit pagination, clamping the limit.
    pub fn new(owner: UserId, limit: usize, offset: usize) -> Self {
        Self {
            owner,
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// Creates a query with the default page size.
    pub fn first_page(owner: UserId) -> Self {
        Self::new(owner, DEFAULT_LIMIT, 0)
    }
}

/// Errors that can occur when listing conversations.
#[derive(Debug, Error)]
pub enum ListConversationsError {
    /// Persistence failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for ListConversations queries.
pub struct ListConversationsHandler<S: ConversationStore> {
    store: Arc<S>,
}

impl<S: ConversationStore> ListConversationsHandler<S> {
    /// Creates a new handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles the query. Unknown owners yield an empty page.
    pub async fn handle(
        &self,
        query: ListConversationsQuery,
    ) -> Result<Vec<ConversationSummary>, ListConversationsError> {
        Ok(self
            .store
            .list(&query.owner, query.limit, query.offset)
            .await?)
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
    async fn lists_owned_conversations() {
        let store = Arc::new(InMemoryConversationStore::new());
        for _ in 0..3 {
            store.create(&owner(), ConversationMetadata::new()).await.unwrap();
        }
        let handler = ListConversationsHandler::new(store);

        let page = handler
            .handle(ListConversationsQuery::first_page(owner()))
            .await
            .unwrap();

        assert_eq!(page.len(), 3);
    }

    #[tokio::test]
    async fn unknown_owner_yields_empty_page() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = ListConversationsHandler::new(store);

        let page = handler
            .handle(ListConversationsQuery::first_page(owner()))
            .await
            .unwrap();

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let query = ListConversationsQuery::new(owner(), 10_000, 0);
        assert_eq!(query.limit, MAX_LIMIT);

        let query = ListConversationsQuery::new(owner(), 0, 0);
        assert_eq!(query.limit, 1);
    }
}
