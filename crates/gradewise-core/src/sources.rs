//! Expected-vocabulary sourcing.
//!
//! The vocabulary a good answer should contain comes from an ordered chain
//! of tiers. Each tier holds one or more `KeywordSource`s whose keywords are
//! accumulated; the first tier that yields anything wins and later tiers are
//! never consulted.

use serde::{Deserialize, Serialize};

use crate::config::GradingConfig;
use crate::keywords::{KeywordExtractor, KeywordSet};
use crate::model::QuestionSpec;

/// A provider of expected keywords for a question.
pub trait KeywordSource: Send + Sync {
    /// Short name used in logs and explanations (e.g. "reference-answer").
    fn name(&self) -> &str;

    /// Keywords this source contributes, in priority order.
    fn keywords(&self, question: &QuestionSpec, extractor: &KeywordExtractor) -> Vec<String>;
}

/// Up to `limit` keywords from the reference answer.
pub struct ReferenceAnswerSource {
    pub limit: usize,
}

impl KeywordSource for ReferenceAnswerSource {
    fn name(&self) -> &str {
        "reference-answer"
    }

    fn keywords(&self, question: &QuestionSpec, extractor: &KeywordExtractor) -> Vec<String> {
        question
            .reference_answer
            .as_ref()
            .map(|content| extractor.extract(&content.to_searchable_text()).first(self.limit))
            .unwrap_or_default()
    }
}

/// Up to `per_criterion` keywords from each criterion description, in scheme order.
pub struct MarkingSchemeSource {
    pub per_criterion: usize,
}

impl KeywordSource for MarkingSchemeSource {
    fn name(&self) -> &str {
        "marking-scheme"
    }

    fn keywords(&self, question: &QuestionSpec, extractor: &KeywordExtractor) -> Vec<String> {
        question
            .marking_scheme
            .iter()
            .filter_map(|c| c.description.as_deref())
            .flat_map(|description| extractor.extract(description).first(self.per_criterion))
            .collect()
    }
}

/// Up to `limit` keywords from the question text itself.
pub struct QuestionTextSource {
    pub limit: usize,
}

impl KeywordSource for QuestionTextSource {
    fn name(&self) -> &str {
        "question-text"
    }

    fn keywords(&self, question: &QuestionSpec, extractor: &KeywordExtractor) -> Vec<String> {
        extractor.extract(&question.text).first(self.limit)
    }
}

/// A group of sources whose keywords are accumulated together.
pub struct SourceTier {
    sources: Vec<Box<dyn KeywordSource>>,
}

impl SourceTier {
    pub fn new(sources: Vec<Box<dyn KeywordSource>>) -> Self {
        Self { sources }
    }

    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// The expected vocabulary together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedKeywords {
    pub keywords: KeywordSet,
    /// Names of the tier's sources, joined by `+`; `None` when every tier was empty.
    pub source: Option<String>,
}

/// Builds the expected keyword set for a question from a chain of tiers.
pub struct ExpectedKeywordBuilder {
    tiers: Vec<SourceTier>,
}

impl ExpectedKeywordBuilder {
    /// An empty chain. Always yields an empty set until tiers are added.
    pub fn empty() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Append a tier to the end of the chain.
    pub fn tier(mut self, tier: SourceTier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// The standard chain: reference answer plus marking scheme, falling
    /// back to the question text.
    pub fn from_config(config: &GradingConfig) -> Self {
        Self::empty()
            .tier(SourceTier::new(vec![
                Box::new(ReferenceAnswerSource {
                    limit: config.reference_keyword_limit,
                }),
                Box::new(MarkingSchemeSource {
                    per_criterion: config.criterion_keyword_limit,
                }),
            ]))
            .tier(SourceTier::new(vec![Box::new(QuestionTextSource {
                limit: config.question_keyword_limit,
            })]))
    }

    /// Evaluate tiers in order until one yields a non-empty set.
    pub fn build(&self, question: &QuestionSpec, extractor: &KeywordExtractor) -> ExpectedKeywords {
        for tier in &self.tiers {
            let mut keywords = KeywordSet::new();
            for source in &tier.sources {
                keywords.extend(source.keywords(question, extractor));
            }
            if !keywords.is_empty() {
                let source = tier.describe();
                tracing::debug!(
                    question = %question.id,
                    source = %source,
                    count = keywords.len(),
                    "expected keywords resolved"
                );
                return ExpectedKeywords {
                    keywords,
                    source: Some(source),
                };
            }
        }

        tracing::debug!(question = %question.id, "no expected keywords from any source");
        ExpectedKeywords {
            keywords: KeywordSet::new(),
            source: None,
        }
    }
}

impl Default for ExpectedKeywordBuilder {
    fn default() -> Self {
        Self::from_config(&GradingConfig::default())
    }
}
