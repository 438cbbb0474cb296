//! Request/response DTOs for the REST API.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{
    Conversation, ConversationSummary, Message, MessageMetadata, Role,
};
use crate::domain::foundation::{ConversationId, MessageId, Timestamp};

/// Request body for creating a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationRequest {
    /// Optional conversation title.
    pub title: Option<String>,
}

/// Request body for sending a message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// The message content.
    pub content: String,
}

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Page size.
    pub limit: Option<usize>,
    /// Number of entries to skip.
    pub offset: Option<usize>,
}

/// A message as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    /// Message id.
    pub id: MessageId,
    /// Sender role.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Response/provenance metadata.
    #[serde(skip_serializing_if = "MessageMetadata::is_empty")]
    pub metadata: MessageMetadata,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: *message.id(),
            role: message.role(),
            content: message.content().to_string(),
            created_at: *message.created_at(),
            metadata: message.metadata().clone(),
        }
    }
}

/// A full conversation as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    /// Conversation id.
    pub id: ConversationId,
    /// Title, if set.
    pub title: Option<String>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last-update timestamp.
    pub updated_at: Timestamp,
    /// All messages in append order.
    pub messages: Vec<MessageView>,
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: *conversation.id(),
            title: conversation.title().map(String::from),
            created_at: *conversation.created_at(),
            updated_at: *conversation.updated_at(),
            messages: conversation.messages().iter().map(MessageView::from).collect(),
        }
    }
}

/// A conversation summary as returned by listings.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    /// Conversation id.
    pub id: ConversationId,
    /// Title, if set.
    pub title: Option<String>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last-update timestamp.
    pub updated_at: Timestamp,
    /// Total message count.
    pub message_count: usize,
    /// The most recent message.
    pub last_message: Option<MessageView>,
}

impl From<&ConversationSummary> for SummaryView {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.metadata.get("title").cloned(),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            message_count: summary.message_count,
            last_message: summary.last_message.as_ref().map(MessageView::from),
        }
    }
}

/// Response body for deletions.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Whether a conversation was actually removed.
    pub deleted: bool,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    /// Creates an upstream failure error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            code: "UPSTREAM_ERROR".to_string(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ConversationMetadata;
    use crate::domain::foundation::UserId;

    fn conversation() -> Conversation {
        let mut metadata = ConversationMetadata::new();
        metadata.insert("title".into(), "Payroll questions".into());
        Conversation::new(UserId::new("default_user").unwrap(), metadata, "base prompt")
    }

    #[test]
    fn conversation_view_carries_title_and_messages() {
        let mut conv = conversation();
        conv.append(Message::user("hello").unwrap());

        let view = ConversationView::from(&conv);
        assert_eq!(view.title.as_deref(), Some("Payroll questions"));
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].content, "hello");
    }

    #[test]
    fn message_view_omits_empty_metadata() {
        let msg = Message::user("hello").unwrap();
        let json = serde_json::to_value(MessageView::from(&msg)).unwrap();
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn summary_view_exposes_title_from_metadata() {
        let conv = conversation();
        let view = SummaryView::from(&conv.summary());
        assert_eq!(view.title.as_deref(), Some("Payroll questions"));
        assert_eq!(view.message_count, 1);
    }

    #[test]
    fn error_response_codes() {
        assert_eq!(ErrorResponse::bad_request("x").code, "BAD_REQUEST");
        assert_eq!(ErrorResponse::not_found("Conversation", "abc").code, "NOT_FOUND");
        assert_eq!(ErrorResponse::upstream("x").code, "UPSTREAM_ERROR");
        assert_eq!(ErrorResponse::internal("x").code, "INTERNAL_ERROR");
    }
}
