//! Intent classification service.
//!
//! Wraps the completion port with the greeting fast path and the
//! near-deterministic classification call. Failures of the underlying
//! completion call are not recovered here; the orchestrator treats them as
//! request failures.

use std::sync::Arc;

use tracing::info;

use crate::domain::chat::{classification_prompt, fast_path_intent, MessageIntent};
use crate::domain::conversation::Conversation;
use crate::ports::{
    ChatTurn, CompletionError, CompletionRequest, CompletionService, CLASSIFICATION_TEMPERATURE,
};

/// Number of history messages included in the classification request.
const HISTORY_WINDOW: usize = 5;

/// Classifies inbound messages into intent categories.
pub struct IntentClassifier<C: CompletionService> {
    completion: Arc<C>,
}

impl<C: CompletionService> IntentClassifier<C> {
    /// Creates a classifier over the given completion service.
    pub fn new(completion: Arc<C>) -> Self {
        Self { completion }
    }

    /// Classifies a message given its conversation so far.
    ///
    /// The fast path answers fixed greetings without any completion call; it
    /// is purely a latency and cost optimization and never changes the
    /// classification of anything outside the fixed phrase set.
    pub async fn classify(
        &self,
        content: &str,
        conversation: &Conversation,
    ) -> Result<MessageIntent, CompletionError> {
        if let Some(intent) = fast_path_intent(content) {
            info!(%intent, "fast-path classification for greeting/courtesy message");
            return Ok(intent);
        }

        let history = conversation.recent_dialogue(HISTORY_WINDOW);
        let prompt = classification_prompt(&history, content);

        let request = CompletionRequest::new()
            .with_turn(ChatTurn::user(prompt))
            .with_temperature(CLASSIFICATION_TEMPERATURE);

        let response = self.completion.complete(request).await?;
        let intent = MessageIntent::from_completion(&response);
        info!(%intent, requires_retrieval = intent.requires_retrieval(), "message intent classified");

        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionService;
    use crate::domain::conversation::{ConversationMetadata, Message};
    use crate::domain::foundation::UserId;

    fn conversation() -> Conversation {
        Conversation::new(
            UserId::new("default_user").unwrap(),
            ConversationMetadata::new(),
            "base prompt",
        )
    }

    fn classifier(mock: &MockCompletionService) -> IntentClassifier<MockCompletionService> {
        IntentClassifier::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn fast_path_skips_the_completion_call() {
        let mock = MockCompletionService::new();
        let result = classifier(&mock).classify("oi", &conversation()).await.unwrap();

        assert_eq!(result, MessageIntent::Conversational);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn classification_call_parses_system_knowledge() {
        let mock = MockCompletionService::new().with_response("SYSTEM_KNOWLEDGE");
        let result = classifier(&mock)
            .classify("how do I archive a document?", &conversation())
            .await
            .unwrap();

        assert_eq!(result, MessageIntent::SystemKnowledge);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn classification_uses_low_temperature() {
        let mock = MockCompletionService::new().with_response("CONVERSATIONAL");
        classifier(&mock)
            .classify("tell me something nice", &conversation())
            .await
            .unwrap();

        let request = mock.last_call().unwrap();
        assert_eq!(request.temperature, CLASSIFICATION_TEMPERATURE);
    }

    #[tokio::test]
    async fn classification_prompt_includes_recent_history() {
        let mut conv = conversation();
        conv.append(Message::user("how do approvals work?").unwrap());
        conv.append(Message::assistant("They require a manager sign-off.").unwrap());

        let mock = MockCompletionService::new().with_response("SYSTEM_KNOWLEDGE");
        classifier(&mock).classify("and after that?", &conv).await.unwrap();

        let prompt = &mock.last_call().unwrap().messages[0].content;
        assert!(prompt.contains("User: how do approvals work?"));
        assert!(prompt.contains("Assistant: They require a manager sign-off."));
        assert!(prompt.contains("and after that?"));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let mock = MockCompletionService::new().with_error(CompletionError::unavailable("down"));
        let result = classifier(&mock)
            .classify("how do I archive a document?", &conversation())
            .await;

        assert!(matches!(result, Err(CompletionError::Unavailable { .. })));
    }
}
