//! Learner-facing feedback: summary, strengths, and improvements.

use crate::config::GradingConfig;
use crate::keywords::KeywordMatch;

/// Keywords named in any single feedback line.
const NAMED_KEYWORDS: usize = 3;

/// Phrases that signal the learner illustrated a point.
const EXAMPLE_MARKERS: &[&str] = &["example", "instance", "such as"];

/// Composed feedback for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub summary: String,
    /// Never empty.
    pub strengths: Vec<String>,
    /// Never empty.
    pub improvements: Vec<String>,
}

/// Textual features of a response that feedback rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseTraits {
    pub length: usize,
    pub has_paragraph_break: bool,
    pub uses_examples: bool,
}

impl ResponseTraits {
    pub fn of(response: &str) -> Self {
        let lowered = response.to_lowercase();
        Self {
            length: response.chars().count(),
            has_paragraph_break: response.replace("\r\n", "\n").contains("\n\n"),
            uses_examples: EXAMPLE_MARKERS.iter().any(|m| lowered.contains(m)),
        }
    }
}

/// Build summary, strengths and improvements for a scored response.
pub fn compose_feedback(
    response: &str,
    keywords: &KeywordMatch,
    percentage: u32,
    config: &GradingConfig,
) -> Feedback {
    let traits = ResponseTraits::of(response);
    Feedback {
        summary: summary_feedback(percentage, &keywords.matched),
        strengths: strengths(&traits, &keywords.matched, percentage, config),
        improvements: improvements(&traits, &keywords.missing, percentage, config),
    }
}

/// One template per percentage band, plus the key terms the learner used.
pub fn summary_feedback(percentage: u32, matched: &[String]) -> String {
    let mut summary = match percentage {
        90.. => "Excellent answer! You demonstrate a thorough understanding of the topic.",
        80..=89 => "Very good answer. You show a strong grasp of the key concepts.",
        70..=79 => "Good answer. You cover the main points, but there is room for more depth.",
        60..=69 => concat!(
            "Satisfactory answer. You show a basic understanding, ",
            "but some key points are missing."
        ),
        50..=59 => concat!(
            "Your answer shows partial understanding. ",
            "Review the key concepts and add more detail."
        ),
        _ => "Your answer needs significant improvement. Revisit the core material and try again.",
    }
    .to_string();

    if !matched.is_empty() {
        summary.push_str(&format!(
            " You correctly used key terms such as: {}.",
            named(matched)
        ));
    }
    summary
}

fn strengths(
    traits: &ResponseTraits,
    matched: &[String],
    percentage: u32,
    config: &GradingConfig,
) -> Vec<String> {
    let mut out = Vec::new();

    if !matched.is_empty() {
        out.push(format!("Used relevant key terms: {}", named(matched)));
    }
    if traits.length > config.detailed_length {
        out.push("Provided a detailed response".to_string());
    }
    if traits.has_paragraph_break {
        out.push("Organized the answer into clear paragraphs".to_string());
    }
    if traits.uses_examples {
        out.push("Supported points with examples".to_string());
    }
    if percentage >= 80 {
        out.push("Demonstrated strong understanding of the concepts".to_string());
    } else if percentage >= 60 {
        out.push("Demonstrated a basic understanding of the concepts".to_string());
    }

    if out.is_empty() {
        out.push("Attempted the question".to_string());
    }
    out
}

fn improvements(
    traits: &ResponseTraits,
    missing: &[String],
    percentage: u32,
    config: &GradingConfig,
) -> Vec<String> {
    let mut out = Vec::new();

    if !missing.is_empty() {
        out.push(format!("Include key concepts such as: {}", named(missing)));
    }
    if traits.length < config.brief_length {
        out.push("Add more detail and explanation to your answer".to_string());
    }
    if percentage < 60 {
        out.push("Review the core concepts of this topic".to_string());
    }
    if !traits.has_paragraph_break {
        out.push("Improve structure by organizing your answer into paragraphs".to_string());
    }
    if percentage >= 90 && out.is_empty() {
        out.push("Challenge yourself with more advanced practice questions".to_string());
    }

    if out.is_empty() {
        out.push("Be more specific in your explanations".to_string());
    }
    out
}

fn named(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(NAMED_KEYWORDS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}
