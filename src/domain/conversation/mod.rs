//! Conversation aggregate and message entities.

mod conversation;
mod message;

pub use conversation::{Conversation, ConversationMetadata, ConversationSummary};
pub use message::{Message, MessageMetadata, Role};
