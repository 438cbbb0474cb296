//! Prompt assembly: the base system prompt, the classification request, and
//! context formatting.
//!
//! The base prompt is stored as the first message of every conversation. The
//! strategy-specific instructions live on [`ResponseStrategy`]; at generation
//! time they are passed as a per-request parameter and never written back into
//! the conversation.

use crate::domain::conversation::Message;
use crate::domain::retrieval::ContextSnippet;

/// Behavior-constraint template seeded as the first message of a conversation.
pub const BASE_SYSTEM_PROMPT: &str = "\
You are a helpful, friendly assistant specialized in the company's document \
knowledge base.

Important rules:
1. Use ONLY the information from the provided context to answer questions
2. If the information is in the context, give a detailed, well-structured answer
3. If you cannot find the specific information in the context, say so clearly
4. Be direct and clear in your answers
5. Keep a professional but friendly tone
6. You may ONLY answer questions related to the document knowledge base and its processes
7. For questions about unrelated systems, products, or services, explain that you do not have that information

Remember: your role is to help the user understand the company's document \
knowledge base and its processes, as documented in the company's files.";

/// Formats non-system history as alternating speaker turns for classification.
pub fn format_dialogue(history: &[&Message]) -> String {
    history
        .iter()
        .filter(|m| !m.is_system())
        .map(|m| {
            let speaker = if m.is_user() { "User" } else { "Assistant" };
            format!("{}: {}", speaker, m.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the classification request for one inbound message.
///
/// The instruction names the three categories with examples; the model is asked
/// to answer with exactly one category keyword.
pub fn classification_prompt(history: &[&Message], content: &str) -> String {
    format!(
        "Determine whether the following message requires a search of the company's \
documents to be answered properly.

Context: you are an assistant for a company, answering questions about its internal \
systems and processes.

Classify the user's message into exactly one of these categories:

1) SYSTEM_KNOWLEDGE: a question or request about the company's systems, processes, \
or business rules (REQUIRES SEARCH)
2) CONVERSATIONAL: a greeting, a thank-you, or general conversational small talk \
(NO SEARCH REQUIRED)
3) GENERAL_KNOWLEDGE: a general-knowledge question unrelated to the company's \
systems, such as sports or entertainment (NO SEARCH REQUIRED)

Examples:
- \"How do I access the HR system?\" -> SYSTEM_KNOWLEDGE
- \"Good morning, how are you?\" -> CONVERSATIONAL
- \"Who won the last world cup?\" -> GENERAL_KNOWLEDGE
- \"What is the vacation approval process?\" -> SYSTEM_KNOWLEDGE
- \"Thanks for the help!\" -> CONVERSATIONAL
- \"Who is the president of France?\" -> GENERAL_KNOWLEDGE

Recent conversation history:
{}

Current user message: \"{}\"

Answer with exactly one of \"SYSTEM_KNOWLEDGE\", \"CONVERSATIONAL\" or \"GENERAL_KNOWLEDGE\":",
        format_dialogue(history),
        content
    )
}

/// Formats retrieved snippets into the context block appended to user content.
pub fn format_context(snippets: &[ContextSnippet]) -> String {
    if snippets.is_empty() {
        return "No relevant context found.".to_string();
    }

    let mut context = String::from("Relevant context:\n\n");
    for (i, snippet) in snippets.iter().enumerate() {
        context.push_str(&format!(
            "Excerpt {} (source: {}):\n{}\n\n",
            i + 1,
            snippet.short_source(),
            snippet.text
        ));
    }
    context
}
