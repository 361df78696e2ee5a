//! Grading result types.
//!
//! `GradingReport` is the value a caller persists for each graded response.
//! Field names are serialized in camelCase to match existing deployments.

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordMatch;
use crate::scoring::{Grade, QualityScore};

/// Structured output of one grading call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingReport {
    pub marks_awarded: u32,
    pub max_marks: u32,
    /// `round(marks_awarded / max_marks * 100)`.
    pub percentage: u32,
    pub grade: Grade,
    pub summary_feedback: String,
    /// Never empty.
    pub strengths: Vec<String>,
    /// Never empty.
    pub improvements: Vec<String>,
    /// Sums exactly to `marks_awarded`.
    pub breakdown: Vec<CriterionResult>,
    pub suggested_resources: Vec<String>,
}

impl GradingReport {
    /// Sum of the per-criterion marks.
    pub fn breakdown_total(&self) -> u32 {
        self.breakdown.iter().map(|c| c.marks_awarded).sum()
    }
}

/// Marks and feedback for one marking criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResult {
    pub name: String,
    pub marks_awarded: u32,
    pub max_marks: u32,
    pub feedback: String,
}

/// A report plus the intermediate signals that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingOutcome {
    pub report: GradingReport,
    /// Expected keywords found and missing.
    pub keywords: KeywordMatch,
    /// Length and match signals, raw marks, and the floor-rule decision.
    pub quality: QualityScore,
    /// Which keyword tier supplied the expected vocabulary.
    pub expected_source: Option<String>,
}
