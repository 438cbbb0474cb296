//! Message intent classification categories.
//!
//! Every inbound user message is classified into one of three categories that
//! decide whether the document index is consulted before answering.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Intent category of an inbound user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageIntent {
    /// Question about the document base or its processes; requires retrieval.
    SystemKnowledge,
    /// Greeting, courtesy, or small talk; answered directly.
    Conversational,
    /// General-knowledge question outside the document base; answered directly.
    GeneralKnowledge,
}

impl MessageIntent {
    /// Returns true when this intent requires a vector search.
    pub fn requires_retrieval(&self) -> bool {
        matches!(self, MessageIntent::SystemKnowledge)
    }

    /// The literal keyword used in classification prompts and responses.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            MessageIntent::SystemKnowledge => "SYSTEM_KNOWLEDGE",
            MessageIntent::Conversational => "CONVERSATIONAL",
            MessageIntent::GeneralKnowledge => "GENERAL_KNOWLEDGE",
        }
    }

    /// Parses a completion response into an intent.
    ///
    /// Checks `SYSTEM_KNOWLEDGE` before `GENERAL_KNOWLEDGE` and falls back to
    /// `Conversational`, so ambiguous responses take the no-retrieval path.
    pub fn from_completion(text: &str) -> Self {
        let upper = text.to_uppercase();
        if upper.contains("SYSTEM_KNOWLEDGE") {
            MessageIntent::SystemKnowledge
        } else if upper.contains("GENERAL_KNOWLEDGE") {
            MessageIntent::GeneralKnowledge
        } else {
            MessageIntent::Conversational
        }
    }
}

impl std::fmt::Display for MessageIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_keyword())
    }
}

/// Greetings, courtesies, and closings answered without a classification call.
///
/// Matching is exact on the trimmed, lower-cased content; anything outside this
/// fixed set goes through the full classifier.
static FAST_PATH_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Greetings
        "oi",
        "hi",
        "hello",
        "hey",
        "good morning",
        "good afternoon",
        "good evening",
        "how are you",
        // Courtesies and closings
        "thanks",
        "thank you",
        "ok",
        "okay",
        "bye",
        "goodbye",
        "see you",
        "help",
    ]
    .into_iter()
    .collect()
});

/// Returns `Conversational` for exact greeting/courtesy matches, `None` otherwise.
pub fn fast_path_intent(content: &str) -> Option<MessageIntent> {
    let normalized = content.trim().to_lowercase();
    if FAST_PATH_PHRASES.contains(normalized.as_str()) {
        Some(MessageIntent::Conversational)
    } else {
        None
    }
}
