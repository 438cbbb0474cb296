//! Axum routes for the chat API.
//!
//! REST endpoints:
//! - POST   /api/conversations               - create a conversation
//! - GET    /api/conversations               - list conversation summaries
//! - GET    /api/conversations/:id           - fetch one conversation
//! - DELETE /api/conversations/:id           - delete a conversation
//! - POST   /api/conversations/:id/messages  - send a message
//! - GET    /health                          - liveness probe

use axum::routing::{get, post};
use axum::Router;

use crate::ports::{CompletionService, ConversationStore, RetrievalGateway};

use super::handlers::{
    create_conversation, delete_conversation, get_conversation, health, list_conversations,
    send_message, ChatAppState,
};

/// Builds the chat API router over the given state.
pub fn chat_router<S, C, R>(state: ChatAppState<S, C, R>) -> Router
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    Router::new()
        .route(
            "/api/conversations",
            post(create_conversation::<S, C, R>).get(list_conversations::<S, C, R>),
        )
        .route(
            "/api/conversations/:id",
            get(get_conversation::<S, C, R>).delete(delete_conversation::<S, C, R>),
        )
        .route(
            "/api/conversations/:id/messages",
            post(send_message::<S, C, R>),
        )
        .route("/health", get(health))
        .with_state(state)
}
