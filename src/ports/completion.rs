//! Completion service port - interface for language-model providers.
//!
//! Abstracts the chat-completion capability used for both intent classification
//! (low temperature) and response generation (higher temperature), so the
//! application layer never couples to a specific provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::conversation::Role;

/// Port for chat-completion providers.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generates a completion for the given role-tagged message sequence.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Role of a turn sent to the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => ChatRole::System,
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

/// One turn of a multi-turn completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who speaks this turn.
    pub role: ChatRole,
    /// Turn content.
    pub content: String,
}

impl ChatTurn {
    /// Creates a new turn.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Default temperature for response generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Temperature for near-deterministic classification calls.
pub const CLASSIFICATION_TEMPERATURE: f32 = 0.1;

/// Request for a chat completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered turns (system instruction + history + current input).
    pub messages: Vec<ChatTurn>,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates an empty request at generation temperature.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            temperature: GENERATION_TEMPERATURE,
        }
    }

    /// Adds a turn to the request.
    pub fn with_turn(mut self, turn: ChatTurn) -> Self {
        self.messages.push(turn);
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion provider errors.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Provider is unavailable or returned a server error.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CompletionError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a retry by the caller may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Unavailable { .. }
                | CompletionError::Network(_)
                | CompletionError::Timeout { .. }
        )
    }
}
