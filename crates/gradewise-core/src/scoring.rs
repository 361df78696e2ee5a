//! Response quality scoring and grade classification.
//!
//! A response earns marks from two signals: how long it is relative to a
//! target length, and what fraction of the expected keywords it uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GradingConfig;

/// Intermediate and final values of one quality-scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Response length in characters.
    pub length: usize,
    /// `min(1, length / target_length)`.
    pub length_score: f64,
    /// Fraction of expected keywords present.
    pub match_score: f64,
    /// Weighted blend of the two signals.
    pub combined_score: f64,
    /// `round(combined_score * max_marks)` clamped to `max_marks`, before the floor rule.
    pub raw_marks: u32,
    /// Final marks after the floor rule.
    pub marks_awarded: u32,
    pub max_marks: u32,
    /// `round(marks_awarded / max_marks * 100)`.
    pub percentage: u32,
    /// Whether a substantive attempt was lifted from zero to one mark.
    pub floor_applied: bool,
}

/// Score a response. `max_marks` must already be validated as positive.
pub fn score_response(
    response: &str,
    match_score: f64,
    max_marks: u32,
    config: &GradingConfig,
) -> QualityScore {
    let length = response.chars().count();
    let length_score = (length as f64 / config.target_length as f64).min(1.0);
    let combined_score =
        config.length_weight * length_score + config.keyword_weight * match_score;

    let raw_marks = ((combined_score * max_marks as f64).round().max(0.0) as u32).min(max_marks);

    let floor_applied = length > config.substantive_length && raw_marks < 1;
    let marks_awarded = if floor_applied { 1 } else { raw_marks };

    QualityScore {
        length,
        length_score,
        match_score,
        combined_score,
        raw_marks,
        marks_awarded,
        max_marks,
        percentage: percentage_of(marks_awarded, max_marks),
        floor_applied,
    }
}

/// `round(marks / max * 100)`. Returns 0 when `max` is 0.
pub fn percentage_of(marks: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (marks as f64 / max as f64 * 100.0).round() as u32
}

/// Letter grade on the fixed percentage scale.
///
/// Variants are declared lowest first so the derived ordering follows the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    #[serde(rename = "C+")]
    CPlus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

/// Thresholds checked highest first; the first match wins.
const GRADE_SCALE: &[(u32, Grade)] = &[
    (90, Grade::APlus),
    (80, Grade::A),
    (75, Grade::BPlus),
    (70, Grade::B),
    (65, Grade::CPlus),
    (60, Grade::C),
    (50, Grade::D),
];

impl Grade {
    /// Classify a percentage.
    pub fn from_percentage(percentage: u32) -> Grade {
        GRADE_SCALE
            .iter()
            .find(|(threshold, _)| percentage >= *threshold)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// All grades, highest first.
    pub fn all() -> [Grade; 8] {
        [
            Grade::APlus,
            Grade::A,
            Grade::BPlus,
            Grade::B,
            Grade::CPlus,
            Grade::C,
            Grade::D,
            Grade::F,
        ]
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::all()
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown grade: {s}"))
    }
}
