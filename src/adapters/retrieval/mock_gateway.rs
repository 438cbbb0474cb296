//! Mock retrieval gateway for testing.
//!
//! Returns scripted snippet batches in order and records every query, so tests
//! can assert whether and how retrieval was invoked.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::retrieval::ContextSnippet;
use crate::ports::{RetrievalError, RetrievalGateway};

/// A configured mock search result.
#[derive(Debug, Clone)]
enum MockResult {
    /// Return these snippets.
    Success(Vec<ContextSnippet>),
    /// Return an error.
    Error(RetrievalError),
}

/// Mock retrieval gateway with scripted results.
#[derive(Debug, Clone, Default)]
pub struct MockRetrievalGateway {
    /// Pre-configured results (consumed in order).
    results: Arc<Mutex<VecDeque<MockResult>>>,
    /// Recorded queries for verification.
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockRetrievalGateway {
    /// Creates a new mock gateway with no scripted results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snippet batch to the queue.
    pub fn with_results(self, snippets: Vec<ContextSnippet>) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Success(snippets));
        self
    }

    /// Adds an empty result to the queue.
    pub fn with_empty_result(self) -> Self {
        self.with_results(Vec::new())
    }

    /// Adds an error to the queue.
    pub fn with_error(self, error: RetrievalError) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Error(error));
        self
    }

    /// Returns the number of searches performed.
    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    /// Returns all recorded queries.
    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalGateway for MockRetrievalGateway {
    async fn search(
        &self,
        query: &str,
        _top_k: usize,
    ) -> Result<Vec<ContextSnippet>, RetrievalError> {
        self.queries.lock().unwrap().push(query.to_string());

        match self.results.lock().unwrap().pop_front() {
            Some(MockResult::Success(snippets)) => Ok(snippets),
            Some(MockResult::Error(err)) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_scripted_results_in_order() {
        let gateway = MockRetrievalGateway::new()
            .with_results(vec![ContextSnippet::new("v1", 0.9, "first")])
            .with_empty_result();

        let first = gateway.search("q1", 3).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "v1");

        let second = gateway.search("q2", 3).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn exhausted_script_yields_empty() {
        let gateway = MockRetrievalGateway::new();
        assert!(gateway.search("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn returns_scripted_error() {
        let gateway =
            MockRetrievalGateway::new().with_error(RetrievalError::unavailable("index down"));
        let result = gateway.search("q", 3).await;
        assert!(matches!(result, Err(RetrievalError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn records_queries() {
        let gateway = MockRetrievalGateway::new();
        gateway.search("how do approvals work", 3).await.unwrap();

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.recorded_queries(), vec!["how do approvals work"]);
    }
}
