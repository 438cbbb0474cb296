//! Retrieved context and its relevance evaluation.

mod evaluator;
mod snippet;

pub use evaluator::{
    RelevanceAssessment, RelevanceEvaluator, RelevanceThresholds, RelevanceTier,
};
pub use snippet::ContextSnippet;
