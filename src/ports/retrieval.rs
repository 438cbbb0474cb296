//! Retrieval gateway port - interface to the vector index.
//!
//! Query embedding happens inside the gateway; the application layer only ever
//! sees scored snippets, ordered best first. An empty result is a normal
//! outcome, not an error.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::retrieval::ContextSnippet;

/// Port for context retrieval from the vector index.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Searches for snippets similar to `query`, ordered descending by score.
    ///
    /// Returns an empty vec when nothing matches.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ContextSnippet>, RetrievalError>;
}

/// Retrieval gateway errors.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// Index service is unavailable or returned a server error.
    #[error("retrieval unavailable: {message}")]
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

    /// Failed to parse the index response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl RetrievalError {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn RetrievalGateway) {}
    }

    #[test]
    fn errors_display_their_detail() {
        let err = RetrievalError::unavailable("index down");
        assert_eq!(err.to_string(), "retrieval unavailable: index down");

        let err = RetrievalError::Timeout { timeout_secs: 10 };
        assert_eq!(err.to_string(), "request timed out after 10s");
    }
}
