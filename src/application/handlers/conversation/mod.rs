//! Conversation command and query handlers.

mod create_conversation;
mod delete_conversation;
mod get_conversation;
mod list_conversations;
mod send_message;

pub use create_conversation::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
};
pub use delete_conversation::{
    DeleteConversationCommand, DeleteConversationError, DeleteConversationHandler,
};
pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use list_conversations::{
    ListConversationsError, ListConversationsHandler, ListConversationsQuery, DEFAULT_LIMIT,
    MAX_LIMIT,
};
pub use send_message::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
};
