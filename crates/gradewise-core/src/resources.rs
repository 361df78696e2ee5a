//! Study-resource suggestions driven by the gaps in a response.

use crate::model::{QuestionSpec, QuestionType};

/// Missing keywords turned into individual suggestions.
const MISSING_KEYWORD_SUGGESTIONS: usize = 3;

/// Generic suggestions used to pad short lists, in order.
const FALLBACK_RESOURCES: &[&str] = &[
    "Ask the AI tutor for a guided explanation of this question",
    "Join a study group to discuss this topic with peers",
];

/// Minimum number of suggestions returned.
const MIN_RESOURCES: usize = 3;

/// The one practice resource matched to a question format.
pub fn resource_for(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => {
            "Practice with multiple-choice question banks on this topic"
        }
        QuestionType::ShortAnswer => {
            "Practice writing concise, focused answers that use key terminology"
        }
        QuestionType::Essay => "Study model essays and practice structuring extended answers",
        QuestionType::Calculation => {
            "Work through step-by-step worked examples and practice problems"
        }
        QuestionType::Diagram => "Practice drawing and labelling diagrams for this topic",
        QuestionType::Practical => "Review practical procedures and sample experiment write-ups",
        QuestionType::Other => "Review your course notes and textbook chapters on this topic",
    }
}

/// Suggest resources for a response, capped at `max_resources`.
pub fn recommend_resources(
    question: &QuestionSpec,
    missing: &[String],
    max_resources: usize,
) -> Vec<String> {
    let cap = max_resources.max(MIN_RESOURCES);
    let mut out = Vec::new();

    if let Some(topic) = question.topic.as_deref().filter(|t| !t.trim().is_empty()) {
        out.push(format!("Review the topic: {}", topic.trim()));
    }

    // Keep room for the question-type entry.
    let keyword_budget = MISSING_KEYWORD_SUGGESTIONS.min(cap - out.len() - 1);
    out.extend(
        missing
            .iter()
            .take(keyword_budget)
            .map(|keyword| format!("Look up the concept \"{keyword}\" in your notes")),
    );

    out.push(resource_for(question.question_type).to_string());

    for fallback in FALLBACK_RESOURCES {
        if out.len() >= MIN_RESOURCES {
            break;
        }
        out.push(fallback.to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn minimal_list_is_padded_to_three() {
        let q = QuestionSpec::new("q", "Explain", 5);
        let resources = recommend_resources(&q, &[], 6);
        assert_eq!(
            resources,
            vec![
                resource_for(QuestionType::ShortAnswer).to_string(),
                FALLBACK_RESOURCES[0].to_string(),
                FALLBACK_RESOURCES[1].to_string(),
            ]
        );
    }

    #[test]
    fn topic_and_missing_keywords_come_first() {
        let mut q = QuestionSpec::new("q", "Explain", 5);
        q.topic = Some("Cell Biology".into());
        q.question_type = QuestionType::Essay;
        let resources =
            recommend_resources(&q, &missing(&["osmosis", "membrane", "solute", "gradient"]), 6);
        assert_eq!(resources.len(), 5);
        assert_eq!(resources[0], "Review the topic: Cell Biology");
        assert!(resources[1].contains("osmosis"));
        assert!(resources[3].contains("solute"));
        assert_eq!(resources[4], resource_for(QuestionType::Essay));
        assert!(!resources.iter().any(|r| r.contains("gradient")));
    }

    #[test]
    fn exactly_one_type_resource() {
        let mut q = QuestionSpec::new("q", "Compute", 5);
        q.question_type = QuestionType::Calculation;
        let resources = recommend_resources(&q, &missing(&["velocity"]), 6);
        let type_entries = resources
            .iter()
            .filter(|r| r.as_str() == resource_for(QuestionType::Calculation))
            .count();
        assert_eq!(type_entries, 1);
        assert_eq!(resources.len(), 3);
    }

    #[test]
    fn cap_is_respected() {
        let mut q = QuestionSpec::new("q", "Explain", 5);
        q.topic = Some("Genetics".into());
        let resources = recommend_resources(&q, &missing(&["allele", "locus", "dominant"]), 3);
        assert_eq!(
            resources,
            vec![
                "Review the topic: Genetics".to_string(),
                "Look up the concept \"allele\" in your notes".to_string(),
                resource_for(QuestionType::ShortAnswer).to_string(),
            ]
        );
    }

    #[test]
    fn other_type_uses_default_resource() {
        let mut q = QuestionSpec::new("q", "Explain", 5);
        q.question_type = QuestionType::Other;
        let resources = recommend_resources(&q, &[], 6);
        assert_eq!(resources[0], resource_for(QuestionType::Other));
    }
}
