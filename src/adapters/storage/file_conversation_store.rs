//! File-based conversation store.
//!
//! One JSON document per conversation, under a per-owner directory:
//! `<base>/<owner_id>/<conversation_id>.json`. Every mutation rewrites the
//! whole document, so mutations are serialized per conversation id through
//! [`ConversationLocks`].

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::domain::chat::BASE_SYSTEM_PROMPT;
use crate::domain::conversation::{
    Conversation, ConversationMetadata, ConversationSummary, Message, MessageMetadata, Role,
};
use crate::domain::foundation::{ConversationId, MessageId, UserId};
use crate::ports::{ConversationStore, StoreError};

use super::locks::ConversationLocks;

/// Durable store writing one JSON file per conversation.
#[derive(Debug)]
pub struct FileConversationStore {
    base_path: PathBuf,
    locks: ConversationLocks,
}

impl FileConversationStore {
    /// Creates a store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            locks: ConversationLocks::new(),
        }
    }

    fn owner_dir(&self, owner: &UserId) -> PathBuf {
        self.base_path.join(owner.as_str())
    }

    fn conversation_path(&self, id: &ConversationId, owner: &UserId) -> PathBuf {
        self.owner_dir(owner).join(format!("{}.json", id))
    }

    async fn write_conversation(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let dir = self.owner_dir(conversation.owner());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(e.to_string()))?;

        let path = self.conversation_path(conversation.id(), conversation.owner());
        let json = serde_json::to_vec_pretty(conversation)
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| StoreError::io(e.to_string()))
    }

    async fn read_conversation(
        &self,
        id: &ConversationId,
        owner: &UserId,
    ) -> Result<Option<Conversation>, StoreError> {
        let path = self.conversation_path(id, owner);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(e.to_string())),
        };

        let conversation = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::deserialization(format!("{}: {}", path.display(), e)))?;
        Ok(Some(conversation))
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn create(
        &self,
        owner: &UserId,
        metadata: ConversationMetadata,
    ) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new(owner.clone(), metadata, BASE_SYSTEM_PROMPT);
        let _guard = self.locks.acquire(*conversation.id()).await;
        self.write_conversation(&conversation).await?;
        Ok(conversation)
    }

    async fn get(
        &self,
        id: &ConversationId,
        owner: &UserId,
    ) -> Result<Option<Conversation>, StoreError> {
        self.read_conversation(id, owner).await
    }

    async fn list(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationSummary>, StoreError> {
        let dir = self.owner_dir(owner);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(e.to_string())),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<ConversationId>().ok())
            else {
                warn!(path = %path.display(), "skipping non-conversation file in store directory");
                continue;
            };
            if let Some(conversation) = self.read_conversation(&id, owner).await? {
                summaries.push(conversation.summary());
            }
        }

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
        let _guard = self.locks.acquire(*id).await;

        let Some(mut conversation) = self.read_conversation(id, owner).await? else {
            return Ok(None);
        };

        let message = Message::new(role, content)
            .map_err(|e| StoreError::InvalidMessage(e.to_string()))?
            .with_metadata(metadata);
        let message_id = conversation.append(message);

        self.write_conversation(&conversation).await?;
        Ok(Some(message_id))
    }

    async fn delete(&self, id: &ConversationId, owner: &UserId) -> Result<bool, StoreError> {
        let _guard = self.locks.acquire(*id).await;

        let path = self.conversation_path(id, owner);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(e.to_string())),
        }
    }
}
