//! Response strategies: the closed set of ways an answer can be framed.
//!
//! Each strategy selects the per-request system instruction handed to the
//! generation call and whether retrieved context is appended to the user
//! content. Adding a strategy is a compile-time-checked change: every match
//! below is exhaustive.

use serde::{Deserialize, Serialize};

/// How the assistant response is framed for a given message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStrategy {
    /// Conversational message; no retrieval performed.
    Direct,
    /// Out-of-domain general-knowledge question; no retrieval performed.
    GeneralKnowledge,
    /// Confident answer grounded in retrieved context.
    ContextBased,
    /// Answer grounded in context of uncertain relevance.
    ContextBasedUncertain,
    /// Context found, but too weakly related to answer from.
    VeryLowRelevance,
    /// Context found, but judged unrelated to the document base.
    IrrelevantContext,
    /// Nothing usable found; ask the user to rephrase.
    Clarification,
}

impl ResponseStrategy {
    /// Returns the snake_case tag persisted in message metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStrategy::Direct => "direct",
            ResponseStrategy::GeneralKnowledge => "general_knowledge",
            ResponseStrategy::ContextBased => "context_based",
            ResponseStrategy::ContextBasedUncertain => "context_based_uncertain",
            ResponseStrategy::VeryLowRelevance => "very_low_relevance",
            ResponseStrategy::IrrelevantContext => "irrelevant_context",
            ResponseStrategy::Clarification => "clarification",
        }
    }

    /// Returns true when retrieved text is appended to the user content.
    pub fn includes_context(&self) -> bool {
        matches!(
            self,
            ResponseStrategy::ContextBased | ResponseStrategy::ContextBasedUncertain
        )
    }

    /// The system instruction framing the generation call for this strategy.
    pub fn system_instruction(&self) -> &'static str {
        match self {
            ResponseStrategy::Direct => {
                "You are a helpful, friendly assistant for the company's document \
                 knowledge base. This message does not require information from the \
                 documents. Reply naturally and keep the conversation flowing. \
                 Remember that you can only provide information about the document \
                 knowledge base and its processes."
            }
            ResponseStrategy::GeneralKnowledge => {
                "You are a helpful, friendly assistant for the company's document \
                 knowledge base. This message is about general knowledge unrelated \
                 to the documents. Politely explain that you specialize in the \
                 company's document knowledge base and do not have information about \
                 general topics such as sports or entertainment. Offer to help with \
                 questions about the stored documents instead."
            }
            ResponseStrategy::ContextBased => {
                "You are an assistant for the company's document knowledge base. \
                 Use ONLY the provided context to answer the question. Be detailed \
                 and precise, giving clear instructions where applicable. Do not \
                 invent information that is not in the provided context."
            }
            ResponseStrategy::ContextBasedUncertain => {
                "You are an assistant for the company's document knowledge base. \
                 Some possibly related information was found, but it may not be \
                 exactly what the user is looking for. Give the best answer you can \
                 from the context, and note that the user may need to provide more \
                 detail if the answer is not satisfactory. Make clear that you can \
                 only answer questions about the document knowledge base."
            }
            ResponseStrategy::VeryLowRelevance => {
                "You are an assistant for the company's document knowledge base. \
                 Information was found in the company documents, but its relevance \
                 to the question is very low. Politely explain that what was found \
                 does not seem sufficient to answer properly. Ask the user for more \
                 specific detail or a rephrased question focused on the document \
                 knowledge base, and suggest examples such as processing, listing, \
                 or removing documents, or searching the stored documents."
            }
            ResponseStrategy::IrrelevantContext => {
                "You are an assistant for the company's document knowledge base. \
                 The question appears to concern a system or process, but no \
                 relevant information was found in the company documents. Politely \
                 explain that you can only provide information documented in the \
                 company's files, and that you have no information about unrelated \
                 systems, products, or services. Suggest rephrasing the question to \
                 focus on the document knowledge base."
            }
            ResponseStrategy::Clarification => {
                "You are an assistant for the company's document knowledge base. \
                 No specific information about this question was found in the \
                 company documents. Politely ask the user for more detail or a \
                 rephrased question, explaining that you can only answer questions \
                 about the document knowledge base and its processes. Suggest \
                 examples of questions you can answer, such as processing, listing, \
                 or removing documents, or searching the stored documents."
            }
        }
    }
}

impl std::fmt::Display for ResponseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
