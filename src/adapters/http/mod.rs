//! HTTP adapter - REST API over the application handlers.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ConversationView, CreateConversationRequest, DeleteResponse, ErrorResponse, MessageView,
    PaginationParams, SendMessageRequest, SummaryView,
};
pub use handlers::{ApiError, ChatAppState};
pub use routes::chat_router;
