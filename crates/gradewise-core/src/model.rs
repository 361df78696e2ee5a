//! Core data model types for gradewise.
//!
//! These are the read-only inputs of a grading call: the question record
//! (with its reference material and marking scheme) and the learner
//! submissions that are graded against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GradingError;

/// A single gradable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Unique identifier for this question.
    pub id: String,
    /// The question prompt shown to the learner.
    pub text: String,
    /// Total marks available. Must be positive.
    pub max_marks: u32,
    /// Syllabus topic the question belongs to.
    #[serde(default)]
    pub topic: Option<String>,
    /// What kind of answer the question expects.
    #[serde(default)]
    pub question_type: QuestionType,
    /// Model answer used to derive the expected vocabulary.
    #[serde(default)]
    pub reference_answer: Option<ReferenceContent>,
    /// Ordered marking criteria. Order matters for mark allocation.
    #[serde(default)]
    pub marking_scheme: Vec<Criterion>,
}

impl QuestionSpec {
    /// Create a question with no reference material or marking scheme.
    pub fn new(id: impl Into<String>, text: impl Into<String>, max_marks: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            max_marks,
            topic: None,
            question_type: QuestionType::default(),
            reference_answer: None,
            marking_scheme: Vec::new(),
        }
    }

    /// Reject questions that cannot be scored.
    pub fn validate(&self) -> Result<(), GradingError> {
        if self.max_marks == 0 {
            return Err(GradingError::InvalidMaxMarks {
                question_id: self.id.clone(),
                max_marks: 0,
            });
        }
        Ok(())
    }

    /// Sum of all criterion allocations in the marking scheme.
    pub fn scheme_total(&self) -> u32 {
        self.marking_scheme.iter().map(|c| c.max_marks).sum()
    }
}

/// One named criterion of a marking scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion name (e.g. "Mechanism").
    pub name: String,
    /// Marks allocated to this criterion.
    pub max_marks: u32,
    /// What an answer must show to earn these marks.
    #[serde(default)]
    pub description: Option<String>,
}

impl Criterion {
    pub fn new(name: impl Into<String>, max_marks: u32) -> Self {
        Self {
            name: name.into(),
            max_marks,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Supported question formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    #[default]
    ShortAnswer,
    Essay,
    Calculation,
    Diagram,
    Practical,
    /// Any type string the question store uses that gradewise does not know.
    #[serde(other)]
    Other,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
            QuestionType::ShortAnswer => write!(f, "short-answer"),
            QuestionType::Essay => write!(f, "essay"),
            QuestionType::Calculation => write!(f, "calculation"),
            QuestionType::Diagram => write!(f, "diagram"),
            QuestionType::Practical => write!(f, "practical"),
            QuestionType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "multiple-choice" | "mcq" => Ok(QuestionType::MultipleChoice),
            "short-answer" => Ok(QuestionType::ShortAnswer),
            "essay" => Ok(QuestionType::Essay),
            "calculation" => Ok(QuestionType::Calculation),
            "diagram" => Ok(QuestionType::Diagram),
            "practical" => Ok(QuestionType::Practical),
            "other" => Ok(QuestionType::Other),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Reference material attached to a question.
///
/// Question stores hold either a plain model answer or a structured document
/// (key points, worked steps, etc.). Both reduce to searchable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceContent {
    PlainText(String),
    Structured(serde_json::Value),
}

impl ReferenceContent {
    /// Parse a raw JSON document as stored by an external question store.
    ///
    /// Malformed documents are kept as an empty structured value so that the
    /// marking scheme or question text supply the expected vocabulary instead.
    pub fn from_raw_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ReferenceContent::Structured(value),
            Err(e) => {
                tracing::warn!("unparseable structured reference answer, treating as empty: {e}");
                ReferenceContent::Structured(serde_json::Value::Null)
            }
        }
    }

    /// Flatten the content into text suitable for keyword extraction.
    ///
    /// Structured content contributes every string and number leaf in
    /// document order; keys, booleans and nulls carry no vocabulary.
    pub fn to_searchable_text(&self) -> String {
        match self {
            ReferenceContent::PlainText(text) => text.clone(),
            ReferenceContent::Structured(value) => {
                let mut parts = Vec::new();
                collect_leaves(value, &mut parts);
                parts.join(" ")
            }
        }
    }
}

fn collect_leaves(value: &serde_json::Value, out: &mut Vec<String>) {
    use serde_json::Value;

    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Null | Value::Bool(_) => {}
    }
}

/// A collection of questions loaded from one question-bank file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The questions, in file order.
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

impl QuestionBank {
    /// Look up a question by ID.
    pub fn find(&self, question_id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// A learner's answer to one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier for this submission.
    pub id: String,
    /// The question being answered.
    pub question_id: String,
    #[serde(default)]
    pub learner_id: Option<String>,
    /// Raw response text. May be empty.
    #[serde(default)]
    pub response: String,
}
