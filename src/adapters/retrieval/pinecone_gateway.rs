//! Pinecone gateway - implementation of RetrievalGateway over the REST API.
//!
//! Query preparation (embedding) happens inside the gateway: the query text is
//! embedded through an OpenAI-compatible embeddings endpoint, then the vector
//! is sent to the index's `/query` endpoint. Callers only ever see scored
//! snippets.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::retrieval::ContextSnippet;
use crate::ports::{RetrievalError, RetrievalGateway};

/// Configuration for the Pinecone gateway.
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    /// API key for the index service.
    api_key: Secret<String>,
    /// Host of the index query endpoint.
    pub index_host: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl PineconeConfig {
    /// Creates a new configuration.
    pub fn new(api_key: impl Into<String>, index_host: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            index_host: index_host.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Configuration for query embedding.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// API key for the embeddings endpoint.
    api_key: Secret<String>,
    /// Embedding model name.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
}

impl EmbeddingConfig {
    /// Creates a new configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com".to_string(),
        }
    }

    /// Sets the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Retrieval gateway backed by a Pinecone-style vector index.
pub struct PineconeGateway {
    config: PineconeConfig,
    embedding: EmbeddingConfig,
    client: Client,
}

impl PineconeGateway {
    /// Creates a new gateway.
    pub fn new(config: PineconeConfig, embedding: EmbeddingConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            embedding,
            client,
        }
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.config.index_host.trim_end_matches('/'))
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.embedding.base_url)
    }

    /// Embeds the query text.
    async fn embed(&self, query: &str) -> Result<Vec<f32>, RetrievalError> {
        let request = EmbeddingRequest {
            model: self.embedding.model.clone(),
            input: vec![query.to_string()],
        };

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(self.embedding.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_response_status(response).await?;

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::parse(format!("Failed to parse embedding: {}", e)))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RetrievalError::parse("No embedding in response"))
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, RetrievalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(RetrievalError::AuthenticationFailed),
            _ => Err(RetrievalError::unavailable(format!(
                "{}: {}",
                status, error_body
            ))),
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> RetrievalError {
        if e.is_timeout() {
            RetrievalError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            RetrievalError::network(format!("Connection failed: {}", e))
        } else {
            RetrievalError::network(e.to_string())
        }
    }
}

#[async_trait]
impl RetrievalGateway for PineconeGateway {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ContextSnippet>, RetrievalError> {
        let vector = self.embed(query).await?;

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(self.query_url())
            .header("Api-Key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_response_status(response).await?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::parse(format!("Failed to parse query response: {}", e)))?;

        let snippets: Vec<ContextSnippet> = body
            .matches
            .into_iter()
            .map(|m| {
                let mut snippet = ContextSnippet::new(
                    m.id,
                    m.score,
                    m.metadata.text.unwrap_or_else(|| "[text unavailable]".to_string()),
                );
                if let Some(source) = m.metadata.source {
                    snippet = snippet.with_source(source);
                }
                if let Some(doc_id) = m.metadata.doc_id {
                    snippet = snippet.with_doc_id(doc_id);
                }
                if let Some(chunk_index) = m.metadata.chunk_index {
                    snippet = snippet.with_chunk_index(chunk_index);
                }
                snippet
            })
            .collect();

        debug!(query_len = query.len(), results = snippets.len(), "vector search completed");
        Ok(snippets)
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: f64,
    #[serde(default)]
    metadata: MatchMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    text: Option<String>,
    source: Option<String>,
    doc_id: Option<String>,
    chunk_index: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PineconeGateway {
        PineconeGateway::new(
            PineconeConfig::new("pc-test", "https://index.example.net/"),
            EmbeddingConfig::new("sk-test").with_base_url("https://api.example.net"),
        )
    }

    #[test]
    fn query_url_strips_trailing_slash() {
        assert_eq!(gateway().query_url(), "https://index.example.net/query");
    }

    #[test]
    fn embeddings_url_appends_path() {
        assert_eq!(gateway().embeddings_url(), "https://api.example.net/v1/embeddings");
    }

    #[test]
    fn query_request_serializes_camel_case() {
        let request = QueryRequest {
            vector: vec![0.1, 0.2],
            top_k: 3,
            include_metadata: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
    }

    #[test]
    fn query_response_parses_matches_with_metadata() {
        let json = r#"{
            "matches": [
                {
                    "id": "vec-1",
                    "score": 0.87,
                    "metadata": {
                        "text": "Upload via the documents page.",
                        "source": "docs/manual.pdf",
                        "doc_id": "doc-3",
                        "chunk_index": 2
                    }
                },
                {"id": "vec-2", "score": 0.51}
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[0].score, 0.87);
        assert_eq!(response.matches[0].metadata.chunk_index, Some(2));
        assert!(response.matches[1].metadata.text.is_none());
    }

    #[test]
    fn empty_query_response_parses_to_no_matches() {
        let response: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.matches.is_empty());
    }
}
