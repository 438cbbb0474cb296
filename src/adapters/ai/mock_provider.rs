//! Mock completion provider for testing.
//!
//! Configurable to return scripted responses or inject errors, with call
//! recording so tests can assert how many completion calls were made and what
//! they contained.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockCompletionService::new()
//!     .with_response("SYSTEM_KNOWLEDGE")
//!     .with_response("The documented answer.");
//!
//! let text = provider.complete(request).await?;
//! assert_eq!(provider.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{CompletionError, CompletionRequest, CompletionService};

/// A configured mock response.
#[derive(Debug, Clone)]
enum MockResponse {
    /// Return this text.
    Success(String),
    /// Return an error.
    Error(CompletionError),
}

/// Mock completion provider with scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionService {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionService {
    /// Creates a new mock provider with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn recorded_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the most recent recorded request.
    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success("Mock response".to_string()))
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(request);

        match self.next_response() {
            MockResponse::Success(content) => Ok(content),
            MockResponse::Error(err) => Err(err),
        }
    }
}
