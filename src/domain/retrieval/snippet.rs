//! Context snippets returned by the retrieval gateway.

use serde::{Deserialize, Serialize};

/// A retrieved text excerpt with its similarity score and source metadata.
///
/// Transient: snippets live for the duration of one request and are only
/// persisted as denormalized provenance on the resulting assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    /// Identifier of the vector record.
    pub id: String,
    /// Similarity score; treated as monotonic relevance.
    pub score: f64,
    /// The excerpt text.
    pub text: String,
    /// Originating source (typically a file path), if known.
    pub source: Option<String>,
    /// Identifier of the source document, if known.
    pub doc_id: Option<String>,
    /// Position of this chunk within the source document, if known.
    pub chunk_index: Option<u32>,
}

impl ContextSnippet {
    /// Creates a snippet with the required fields.
    pub fn new(id: impl Into<String>, score: f64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score,
            text: text.into(),
            source: None,
            doc_id: None,
            chunk_index: None,
        }
    }

    /// Sets the originating source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the source document id.
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Sets the chunk index.
    pub fn with_chunk_index(mut self, index: u32) -> Self {
        self.chunk_index = Some(index);
        self
    }

    /// Returns the final path segment of the source, for display.
    pub fn short_source(&self) -> &str {
        match &self.source {
            Some(source) => source.rsplit('/').next().unwrap_or(source),
            None => "unknown source",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let snippet = ContextSnippet::new("vec-1", 0.82, "Approval takes two days.")
            .with_source("docs/handbook.pdf")
            .with_doc_id("doc-7")
            .with_chunk_index(3);

        assert_eq!(snippet.score, 0.82);
        assert_eq!(snippet.source.as_deref(), Some("docs/handbook.pdf"));
        assert_eq!(snippet.doc_id.as_deref(), Some("doc-7"));
        assert_eq!(snippet.chunk_index, Some(3));
    }

    #[test]
    fn short_source_takes_last_path_segment() {
        let snippet = ContextSnippet::new("v", 0.5, "t").with_source("a/b/manual.docx");
        assert_eq!(snippet.short_source(), "manual.docx");
    }

    #[test]
    fn short_source_handles_bare_names_and_missing_source() {
        let named = ContextSnippet::new("v", 0.5, "t").with_source("manual.docx");
        assert_eq!(named.short_source(), "manual.docx");

        let missing = ContextSnippet::new("v", 0.5, "t");
        assert_eq!(missing.short_source(), "unknown source");
    }
}
