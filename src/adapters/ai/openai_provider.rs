//! OpenAI provider - implementation of CompletionService for OpenAI-compatible APIs.
//!
//! Talks to the `/v1/chat/completions` endpoint of any OpenAI-compatible
//! server. One provider instance serves both classification (low temperature)
//! and generation (higher temperature); the temperature travels with each
//! request.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com");
//!
//! let provider = OpenAiProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ports::{ChatRole, CompletionError, CompletionRequest, CompletionService};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible chat completion provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    /// Converts a port request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let messages = request
            .messages
            .iter()
            .map(|turn| WireMessage {
                role: match turn.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                }
                .to_string(),
                content: turn.content.clone(),
            })
            .collect();

        WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: request.temperature,
        }
    }

    /// Maps an unsuccessful status into a typed error.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, CompletionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(CompletionError::AuthenticationFailed),
            400..=499 => Err(CompletionError::InvalidRequest(format!(
                "{}: {}",
                status, error_body
            ))),
            _ => Err(CompletionError::unavailable(format!(
                "{}: {}",
                status, error_body
            ))),
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            CompletionError::network(format!("Connection failed: {}", e))
        } else {
            CompletionError::network(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let wire_request = self.to_wire_request(&request);
        debug!(
            model = %wire_request.model,
            turns = wire_request.messages.len(),
            temperature = wire_request.temperature,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_response_status(response).await?;

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::parse("No choices in response"))?;

        Ok(choice.message.content)
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatTurn;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(
            OpenAiConfig::new("sk-test")
                .with_model("gpt-4o-mini")
                .with_base_url("https://api.example.net"),
        )
    }

    #[test]
    fn completions_url_appends_path() {
        assert_eq!(
            provider().completions_url(),
            "https://api.example.net/v1/chat/completions"
        );
    }

    #[test]
    fn wire_request_carries_roles_and_temperature() {
        let request = CompletionRequest::new()
            .with_turn(ChatTurn::system("Be brief"))
            .with_turn(ChatTurn::user("Hello"))
            .with_turn(ChatTurn::assistant("Hi"))
            .with_temperature(0.1);

        let wire = provider().to_wire_request(&request);
        assert_eq!(wire.model, "gpt-4o-mini");
        assert_eq!(wire.temperature, 0.1);
        let roles: Vec<_> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn wire_request_serializes_expected_shape() {
        let request = CompletionRequest::new().with_turn(ChatTurn::user("Hello"));
        let wire = provider().to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
    }

    #[test]
    fn wire_response_parses_content() {
        let json = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "The answer"}}]
        }"#;
        let response: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "The answer");
    }

    #[test]
    fn config_builder_overrides_defaults() {
        let config = OpenAiConfig::new("sk-x")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:8081")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:8081");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
