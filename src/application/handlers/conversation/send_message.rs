//! SendMessage command handler - the response orchestration state machine.
//!
//! Sequences one inbound user message through classification, optional
//! retrieval, relevance evaluation, prompt assembly, generation, and
//! persistence. Stateless per request: everything durable lives in the
//! conversation store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::classifier::IntentClassifier;
use crate::domain::chat::{format_context, MessageIntent, ResponseStrategy};
use crate::domain::conversation::{Message, MessageMetadata, Role};
use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::retrieval::{ContextSnippet, RelevanceAssessment, RelevanceEvaluator};
use crate::ports::{
    ChatTurn, CompletionError, CompletionRequest, CompletionService, ConversationStore,
    RetrievalError, RetrievalGateway, StoreError,
};

/// Command to send a user message into a conversation.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Target conversation.
    pub conversation_id: ConversationId,
    /// The user sending the message.
    pub owner: UserId,
    /// The message content.
    pub content: String,
}

impl SendMessageCommand {
    /// Creates a new send message command.
    pub fn new(
        conversation_id: ConversationId,
        owner: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id,
            owner,
            content: content.into(),
        }
    }
}

/// Errors that can occur while processing a message.
///
/// Low-confidence outcomes (`clarification`, `irrelevant_context`) are
/// successful responses, not errors; only genuine failures appear here.
#[derive(Debug, Error)]
pub enum SendMessageError {
    /// Conversation absent (or owned by someone else).
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    /// Classification or generation call failed.
    #[error("Completion service error: {0}")]
    Completion(#[from] CompletionError),

    /// Retrieval gateway call failed.
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Persistence failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result of processing one message.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    /// The persisted assistant message, including provenance metadata.
    pub message: Message,
    /// The strategy that framed the response.
    pub strategy: ResponseStrategy,
}

/// Handler for SendMessage commands.
pub struct SendMessageHandler<S, C, R>
where
    S: ConversationStore,
    C: CompletionService,
    R: RetrievalGateway,
{
    store: Arc<S>,
    completion: Arc<C>,
    retrieval: Arc<R>,
    classifier: IntentClassifier<C>,
    evaluator: RelevanceEvaluator,
    retrieval_top_k: usize,
}

impl<S, C, R> SendMessageHandler<S, C, R>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(
        store: Arc<S>,
        completion: Arc<C>,
        retrieval: Arc<R>,
        evaluator: RelevanceEvaluator,
        retrieval_top_k: usize,
    ) -> Self {
        let classifier = IntentClassifier::new(Arc::clone(&completion));
        Self {
            store,
            completion,
            retrieval,
            classifier,
            evaluator,
            retrieval_top_k,
        }
    }

    /// Handles a send message command.
    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(SendMessageError::EmptyContent);
        }

        // Load the conversation; its pre-append state is the classification
        // history and the prior turns of the generation input.
        let conversation = self
            .store
            .get(&cmd.conversation_id, &cmd.owner)
            .await?
            .ok_or(SendMessageError::NotFound(cmd.conversation_id))?;

        // Persist the user message first. A downstream failure leaves it in
        // place; callers own any retry policy.
        self.store
            .append_message(
                &cmd.conversation_id,
                &cmd.owner,
                Role::User,
                content,
                MessageMetadata::new(),
            )
            .await?
            .ok_or(SendMessageError::NotFound(cmd.conversation_id))?;

        let intent = self.classifier.classify(content, &conversation).await?;
        let requires_retrieval = intent.requires_retrieval();

        let mut snippets: Vec<ContextSnippet> = Vec::new();
        let mut assessment: Option<RelevanceAssessment> = None;
        if requires_retrieval {
            snippets = self.retrieval.search(content, self.retrieval_top_k).await?;
            let evaluated = self.evaluator.evaluate(&snippets);
            info!(
                tier = %evaluated.tier,
                score = evaluated.best_score,
                original_score = evaluated.original_score,
                "retrieved context evaluated"
            );
            assessment = Some(evaluated);
        }

        let strategy = match (&assessment, intent) {
            (Some(assessment), _) => assessment.strategy,
            (None, MessageIntent::GeneralKnowledge) => ResponseStrategy::GeneralKnowledge,
            (None, _) => ResponseStrategy::Direct,
        };
        info!(%strategy, %intent, requires_retrieval, "response strategy selected");

        // Assemble the generation input: the strategy instruction is a
        // per-request parameter, never written into the conversation.
        let mut request =
            CompletionRequest::new().with_turn(ChatTurn::system(strategy.system_instruction()));
        for message in conversation.messages().iter().filter(|m| !m.is_system()) {
            request = request.with_turn(ChatTurn::new(message.role().into(), message.content()));
        }
        let user_input = if strategy.includes_context() {
            format!("{}\n\n{}", content, format_context(&snippets))
        } else {
            content.to_string()
        };
        request = request.with_turn(ChatTurn::user(user_input));

        let response_text = self.completion.complete(request).await?;

        let metadata = response_metadata(strategy, requires_retrieval, &snippets, &assessment);
        let assistant_id = self
            .store
            .append_message(
                &cmd.conversation_id,
                &cmd.owner,
                Role::Assistant,
                &response_text,
                metadata,
            )
            .await?
            .ok_or(SendMessageError::NotFound(cmd.conversation_id))?;

        // Reload to return the message exactly as persisted.
        let persisted = self
            .store
            .get(&cmd.conversation_id, &cmd.owner)
            .await?
            .and_then(|c| c.find_message(&assistant_id).cloned())
            .ok_or_else(|| {
                warn!(conversation_id = %cmd.conversation_id, "conversation disappeared after append");
                SendMessageError::NotFound(cmd.conversation_id)
            })?;

        Ok(SendMessageResult {
            message: persisted,
            strategy,
        })
    }
}

/// Builds the metadata persisted on the assistant message.
fn response_metadata(
    strategy: ResponseStrategy,
    requires_retrieval: bool,
    snippets: &[ContextSnippet],
    assessment: &Option<RelevanceAssessment>,
) -> MessageMetadata {
    let mut metadata = MessageMetadata::new();
    metadata.insert(
        "response_strategy".to_string(),
        serde_json::Value::from(strategy.as_str()),
    );
    metadata.insert(
        "required_vector_search".to_string(),
        serde_json::Value::from(requires_retrieval),
    );

    if requires_retrieval {
        if let (Some(best), Some(assessment)) = (snippets.first(), assessment.as_ref()) {
            metadata.insert(
                "context_source".to_string(),
                serde_json::Value::from(best.source.clone().unwrap_or_default()),
            );
            metadata.insert(
                "doc_id".to_string(),
                serde_json::Value::from(best.doc_id.clone().unwrap_or_default()),
            );
            metadata.insert(
                "chunk_index".to_string(),
                serde_json::Value::from(best.chunk_index.unwrap_or(0)),
            );
            metadata.insert(
                "similarity_score".to_string(),
                serde_json::Value::from(best.score),
            );
            metadata.insert(
                "relevance_level".to_string(),
                serde_json::Value::from(assessment.tier.as_str()),
            );
        }
    }

    metadata
}
