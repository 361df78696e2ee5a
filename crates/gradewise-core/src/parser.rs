//! TOML question-bank and submission parser.
//!
//! Loads question banks from TOML files and directories, loads submission
//! files, and validates banks for common authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::GradingError;
use crate::model::{
    Criterion, QuestionBank, QuestionSpec, QuestionType, ReferenceContent, Submission,
};

/// Intermediate TOML structure for question-bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    /// Signed so that negative values reach validation instead of failing
    /// deserialization with an opaque type error.
    #[serde(default)]
    max_marks: Option<i64>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default, rename = "type")]
    question_type: Option<String>,
    #[serde(default)]
    reference_answer: Option<TomlReference>,
    /// Raw JSON document, as exported from a question store.
    #[serde(default)]
    reference_answer_json: Option<String>,
    #[serde(default)]
    marking_scheme: Vec<TomlCriterion>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlReference {
    Text(String),
    Table(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct TomlCriterion {
    name: String,
    max_marks: u32,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSubmissionFile {
    #[serde(default)]
    submissions: Vec<TomlSubmission>,
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    id: String,
    question_id: String,
    #[serde(default)]
    learner_id: Option<String>,
    #[serde(default)]
    response: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(convert_question)
        .collect::<Result<Vec<_>, GradingError>>()
        .with_context(|| format!("invalid question in {}", source_path.display()))?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

fn convert_question(q: TomlQuestion) -> Result<QuestionSpec, GradingError> {
    let max_marks = match q.max_marks {
        None => {
            return Err(GradingError::MissingMaxMarks { question_id: q.id });
        }
        Some(m) if m <= 0 || m > u32::MAX as i64 => {
            return Err(GradingError::InvalidMaxMarks {
                question_id: q.id,
                max_marks: m,
            });
        }
        Some(m) => m as u32,
    };

    let question_type = match q.question_type.as_deref() {
        None => QuestionType::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            tracing::debug!(question = %q.id, "{e}, treating as other");
            QuestionType::Other
        }),
    };

    // An explicit reference answer wins over the raw JSON export.
    let reference_answer = match (q.reference_answer, q.reference_answer_json) {
        (Some(TomlReference::Text(text)), _) => Some(ReferenceContent::PlainText(text)),
        (Some(TomlReference::Table(value)), _) => Some(ReferenceContent::Structured(value)),
        (None, Some(raw)) => Some(ReferenceContent::from_raw_json(&raw)),
        (None, None) => None,
    };

    let marking_scheme = q
        .marking_scheme
        .into_iter()
        .map(|c| Criterion {
            name: c.name,
            max_marks: c.max_marks,
            description: c.description,
        })
        .collect();

    Ok(QuestionSpec {
        id: q.id,
        text: q.text,
        max_marks,
        topic: q.topic,
        question_type,
        reference_answer,
        marking_scheme,
    })
}

/// Recursively load all `.toml` question-bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(banks)
}

/// Load one bank from a file, or merge every bank found under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_question_bank(path)?])
    }
}

/// Parse a submissions file.
pub fn parse_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions file: {}", path.display()))?;

    parse_submissions_str(&content, path)
}

/// Parse a submissions TOML string.
pub fn parse_submissions_str(content: &str, source_path: &Path) -> Result<Vec<Submission>> {
    let parsed: TomlSubmissionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(parsed
        .submissions
        .into_iter()
        .map(|s| Submission {
            id: s.id,
            question_id: s.question_id,
            learner_id: s.learner_id,
            response: s.response,
        })
        .collect())
}

/// A warning from question-bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message,
            })
        };

        if !seen_ids.insert(&question.id) {
            warn(format!("duplicate question ID: {}", question.id));
        }

        if question.text.trim().is_empty() {
            warn("question text is empty".into());
        }

        if !question.marking_scheme.is_empty() {
            let total = question.scheme_total();
            if total != question.max_marks {
                warn(format!(
                    "marking scheme totals {total} marks but question is worth {}",
                    question.max_marks
                ));
            }
        }

        for criterion in &question.marking_scheme {
            if criterion.max_marks == 0 {
                warn(format!("criterion '{}' is worth zero marks", criterion.name));
            }
        }

        let has_reference = question
            .reference_answer
            .as_ref()
            .is_some_and(|r| !r.to_searchable_text().trim().is_empty());
        let has_descriptions = question
            .marking_scheme
            .iter()
            .any(|c| c.description.as_deref().is_some_and(|d| !d.trim().is_empty()));
        if !has_reference && !has_descriptions {
            warn(
                "no reference answer or criterion descriptions; keywords will come from the question text"
                    .into(),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "biology-101"
name = "Biology 101"
description = "Introductory plant biology"

[[questions]]
id = "photosynthesis"
text = "Explain how photosynthesis works."
max_marks = 10
topic = "Plant biology"
type = "essay"
reference_answer = "Photosynthesis converts sunlight into chemical energy using chlorophyll"

[[questions.marking_scheme]]
name = "Mechanism"
max_marks = 4
description = "Light reactions and the Calvin cycle"

[[questions.marking_scheme]]
name = "Examples"
max_marks = 3

[[questions.marking_scheme]]
name = "Factors"
max_marks = 3
"#;

    fn path() -> PathBuf {
        PathBuf::from("test.toml")
    }

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &path()).unwrap();
        assert_eq!(bank.id, "biology-101");
        assert_eq!(bank.questions.len(), 1);
        let q = &bank.questions[0];
        assert_eq!(q.max_marks, 10);
        assert_eq!(q.question_type, QuestionType::Essay);
        assert_eq!(q.marking_scheme.len(), 3);
        assert_eq!(q.scheme_total(), 10);
        assert!(matches!(q.reference_answer, Some(ReferenceContent::PlainText(_))));
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_minimal_question() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
text = "Define osmosis."
max_marks = 2
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        let q = &bank.questions[0];
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
        assert!(q.reference_answer.is_none());
        assert!(q.marking_scheme.is_empty());
    }

    #[test]
    fn structured_reference_table() {
        let toml = r#"
[bank]
id = "s"
name = "S"

[[questions]]
id = "q1"
text = "Explain osmosis."
max_marks = 5

[questions.reference_answer]
key_points = ["water moves across a membrane", "down a concentration gradient"]
marks = 5
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        let text = bank.questions[0]
            .reference_answer
            .as_ref()
            .unwrap()
            .to_searchable_text();
        assert!(text.contains("membrane"));
        assert!(text.contains("gradient"));
    }

    #[test]
    fn raw_json_reference_and_malformed_recovery() {
        let toml = r#"
[bank]
id = "j"
name = "J"

[[questions]]
id = "good"
text = "Explain diffusion."
max_marks = 5
reference_answer_json = '{"answer": "particles spread from high concentration"}'

[[questions]]
id = "bad"
text = "Explain diffusion."
max_marks = 5
reference_answer_json = '{"answer": '
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        assert!(bank.questions[0]
            .reference_answer
            .as_ref()
            .unwrap()
            .to_searchable_text()
            .contains("particles"));
        assert_eq!(
            bank.questions[1].reference_answer,
            Some(ReferenceContent::Structured(serde_json::Value::Null))
        );
    }

    #[test]
    fn unknown_type_becomes_other() {
        let toml = r#"
[bank]
id = "t"
name = "T"

[[questions]]
id = "q1"
text = "Sing a song."
max_marks = 3
type = "performance"
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        assert_eq!(bank.questions[0].question_type, QuestionType::Other);
    }

    #[test]
    fn missing_max_marks_is_rejected() {
        let toml = r#"
[bank]
id = "m"
name = "M"

[[questions]]
id = "q1"
text = "Explain."
"#;
        let err = parse_question_bank_str(toml, &path()).unwrap_err();
        let grading = err.downcast_ref::<GradingError>().unwrap();
        assert_eq!(
            grading,
            &GradingError::MissingMaxMarks {
                question_id: "q1".into()
            }
        );
    }

    #[test]
    fn negative_max_marks_is_rejected() {
        let toml = r#"
[bank]
id = "m"
name = "M"

[[questions]]
id = "q1"
text = "Explain."
max_marks = -2
"#;
        let err = parse_question_bank_str(toml, &path()).unwrap_err();
        assert!(format!("{err:#}").contains("max_marks -2"));
    }

    #[test]
    fn validate_reports_authoring_problems() {
        let toml = r#"
[bank]
id = "warn"
name = "Warn"

[[questions]]
id = "same"
text = "Explain photosynthesis."
max_marks = 10

[[questions.marking_scheme]]
name = "Mechanism"
max_marks = 4

[[questions.marking_scheme]]
name = "Bonus"
max_marks = 0

[[questions]]
id = "same"
text = "  "
max_marks = 2
reference_answer = "Something"
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        let warnings = validate_question_bank(&bank);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("text is empty")));
        assert!(messages.iter().any(|m| m.contains("totals 4 marks")));
        assert!(messages.iter().any(|m| m.contains("zero marks")));
        assert!(messages.iter().any(|m| m.contains("no reference answer")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_bank_str(bad, &path()).is_err());
    }

    #[test]
    fn parse_submissions_file() {
        let toml = r#"
[[submissions]]
id = "s1"
question_id = "photosynthesis"
learner_id = "ada"
response = "Plants use sunlight."

[[submissions]]
id = "s2"
question_id = "photosynthesis"
"#;
        let subs = parse_submissions_str(toml, &path()).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].learner_id.as_deref(), Some("ada"));
        assert_eq!(subs[1].response, "");
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bio.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[bank]\nid = 1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "biology-101");

        let single = load_banks(&dir.path().join("bio.toml")).unwrap();
        assert_eq!(single.len(), 1);
    }
}
