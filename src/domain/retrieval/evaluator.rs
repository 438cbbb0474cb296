//! Relevance evaluation of retrieved context.
//!
//! Scores from the vector index alone can rank a superficially similar but
//! off-topic passage too highly, so the evaluator combines the top snippet's
//! score with a keyword penalty before mapping it onto a tier and a response
//! strategy.

use regex::Regex;
use tracing::{debug, info};

use crate::domain::chat::ResponseStrategy;
use crate::domain::foundation::ValidationError;

use super::snippet::ContextSnippet;

/// Topic keywords that indicate content unrelated to the document base.
///
/// Matched as whole words, case-insensitively, against the top snippet's text.
const OFF_TOPIC_KEYWORDS: &[&str] = &[
    // Sports
    "football",
    "soccer",
    "championship",
    "world cup",
    "goalkeeper",
    "striker",
    "stadium",
    "basketball",
    "league table",
    // Entertainment
    "movie",
    "cinema",
    "actor",
    "actress",
    "singer",
    "concert",
    "album",
    "sitcom",
    "celebrity",
    // Politics and geography
    "president of",
    "governor",
    "senator",
    "parliament",
    "capital of",
    "continent",
    "ocean",
    // Food and travel
    "recipe",
    "restaurant",
    "hotel",
    "tourism",
    "vacation",
    // Retail
    "t-shirt",
    "clothing",
    "online store",
    "credit card",
    "shipping",
    "refund",
];

/// Relevance tier of retrieved context, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelevanceTier {
    /// No snippets were returned at all.
    None,
    /// Adjusted score fell below the minimum usable threshold.
    Irrelevant,
    /// Above the minimum but below every named tier.
    Insufficient,
    VeryLow,
    Low,
    Medium,
    High,
}

impl RelevanceTier {
    /// Returns the tag persisted in message metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceTier::None => "none",
            RelevanceTier::Irrelevant => "irrelevant",
            RelevanceTier::Insufficient => "insufficient",
            RelevanceTier::VeryLow => "very_low",
            RelevanceTier::Low => "low",
            RelevanceTier::Medium => "medium",
            RelevanceTier::High => "high",
        }
    }
}

impl std::fmt::Display for RelevanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score thresholds separating the relevance tiers.
///
/// Must be strictly ordered: high > medium > low > very_low > minimum.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RelevanceThresholds {
    /// At or above: highly relevant context.
    pub high: f64,
    /// At or above: moderately relevant context.
    pub medium: f64,
    /// At or above: weakly relevant context.
    pub low: f64,
    /// At or above: context of very low relevance.
    pub very_low: f64,
    /// Below this the context is unusable regardless of tier.
    pub minimum: f64,
}

impl Default for RelevanceThresholds {
    fn default() -> Self {
        Self {
            high: 0.80,
            medium: 0.70,
            low: 0.60,
            very_low: 0.45,
            minimum: 0.35,
        }
    }
}

impl RelevanceThresholds {
    /// Validates the strict ordering that makes tiering well-defined.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ordered = self.high > self.medium
            && self.medium > self.low
            && self.low > self.very_low
            && self.very_low > self.minimum;
        if !ordered {
            return Err(ValidationError::invalid_format(
                "relevance_thresholds",
                "must be strictly ordered high > medium > low > very_low > minimum",
            ));
        }
        Ok(())
    }
}

/// Outcome of evaluating retrieved context for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceAssessment {
    /// Tier the adjusted score landed in.
    pub tier: RelevanceTier,
    /// Whether the context is trustworthy enough to answer from.
    pub is_relevant: bool,
    /// Response strategy the orchestrator should apply.
    pub strategy: ResponseStrategy,
    /// Best score after any keyword penalty.
    pub best_score: f64,
    /// Best score before the penalty, kept for diagnostics.
    pub original_score: f64,
}

/// Evaluates retrieved snippets into a tier and response strategy.
pub struct RelevanceEvaluator {
    thresholds: RelevanceThresholds,
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl RelevanceEvaluator {
    /// Creates an evaluator with the built-in off-topic keyword list.
    pub fn new(thresholds: RelevanceThresholds) -> Result<Self, ValidationError> {
        Self::with_keywords(
            thresholds,
            OFF_TOPIC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        )
    }

    /// Creates an evaluator with a custom off-topic keyword list.
    pub fn with_keywords(
        thresholds: RelevanceThresholds,
        keywords: Vec<String>,
    ) -> Result<Self, ValidationError> {
        thresholds.validate()?;

        let patterns = keywords
            .iter()
            .map(|keyword| {
                let escaped = regex::escape(keyword);
                Regex::new(&format!(r"(?i)\b{}\b", escaped)).map_err(|e| {
                    ValidationError::invalid_format("off_topic_keywords", e.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            thresholds,
            keywords,
            patterns,
        })
    }

    /// Returns the configured thresholds.
    pub fn thresholds(&self) -> &RelevanceThresholds {
        &self.thresholds
    }

    /// Evaluates snippets ordered descending by score.
    ///
    /// Only the top snippet drives the decision; the rest are carried along by
    /// the caller for context assembly.
    pub fn evaluate(&self, snippets: &[ContextSnippet]) -> RelevanceAssessment {
        let Some(best) = snippets.first() else {
            return RelevanceAssessment {
                tier: RelevanceTier::None,
                is_relevant: false,
                strategy: ResponseStrategy::Clarification,
                best_score: 0.0,
                original_score: 0.0,
            };
        };

        let original_score = best.score;
        let mut score = best.score;

        let matched = self.off_topic_matches(&best.text);
        if !matched.is_empty() {
            let reduction_factor = (0.2 + 0.1 * matched.len() as f64).min(0.7);
            info!(
                matches = matched.len(),
                keywords = %matched.join(", "),
                reduction_factor,
                "off-topic keywords found in top snippet, reducing relevance"
            );
            score *= reduction_factor;
        }

        if score < self.thresholds.minimum {
            info!(
                score,
                original_score, "relevance below minimum threshold, treating context as irrelevant"
            );
            return RelevanceAssessment {
                tier: RelevanceTier::Irrelevant,
                is_relevant: false,
                strategy: ResponseStrategy::IrrelevantContext,
                best_score: score,
                original_score,
            };
        }

        let (tier, is_relevant, strategy) = if score >= self.thresholds.high {
            (RelevanceTier::High, true, ResponseStrategy::ContextBased)
        } else if score >= self.thresholds.medium {
            (RelevanceTier::Medium, true, ResponseStrategy::ContextBased)
        } else if score >= self.thresholds.low {
            (
                RelevanceTier::Low,
                true,
                ResponseStrategy::ContextBasedUncertain,
            )
        } else if score >= self.thresholds.very_low {
            (
                RelevanceTier::VeryLow,
                false,
                ResponseStrategy::VeryLowRelevance,
            )
        } else {
            (
                RelevanceTier::Insufficient,
                false,
                ResponseStrategy::Clarification,
            )
        };

        debug!(%tier, score, original_score, "context relevance evaluated");

        RelevanceAssessment {
            tier,
            is_relevant,
            strategy,
            best_score: score,
            original_score,
        }
    }

    /// Returns the distinct keywords matched as whole words in `text`.
    fn off_topic_matches(&self, text: &str) -> Vec<&str> {
        self.patterns
            .iter()
            .zip(&self.keywords)
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, keyword)| keyword.as_str())
            .collect()
    }
}
