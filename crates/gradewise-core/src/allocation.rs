//! Per-criterion mark allocation.
//!
//! The awarded total is split across the marking scheme in declared order.
//! Every criterion but the last gets its rounded proportional share; the last
//! absorbs whatever is left so the breakdown always sums to the total.

use crate::model::{Criterion, QuestionSpec};
use crate::results::CriterionResult;

/// Name of the synthetic criterion used when a question has no scheme.
pub const CONTENT_CRITERION: &str = "Content Understanding";
/// Name of the second synthetic criterion.
pub const APPLICATION_CRITERION: &str = "Application & Examples";

/// Distribute `marks_awarded` across the question's marking scheme.
pub fn allocate(question: &QuestionSpec, marks_awarded: u32) -> Vec<CriterionResult> {
    if question.marking_scheme.is_empty() {
        return synthetic_breakdown(question.max_marks, marks_awarded);
    }
    allocate_scheme(&question.marking_scheme, question.max_marks, marks_awarded)
}

/// Allocate across an explicit scheme.
///
/// Shares are taken from `total_max` (the question's max marks) rather than
/// the scheme total. A share never exceeds what is still unallocated, which
/// keeps the last criterion's remainder non-negative when the scheme
/// over-allocates.
pub fn allocate_scheme(
    scheme: &[Criterion],
    total_max: u32,
    marks_awarded: u32,
) -> Vec<CriterionResult> {
    let mut remaining = marks_awarded;
    let last = scheme.len().saturating_sub(1);

    scheme
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let share = if i == last {
                remaining
            } else {
                proportional_share(criterion.max_marks, total_max, marks_awarded).min(remaining)
            };
            remaining -= share;
            CriterionResult {
                name: criterion.name.clone(),
                marks_awarded: share,
                max_marks: criterion.max_marks,
                feedback: criterion_feedback(
                    share,
                    criterion.max_marks,
                    criterion.description.as_deref(),
                ),
            }
        })
        .collect()
}

fn proportional_share(criterion_max: u32, total_max: u32, marks_awarded: u32) -> u32 {
    if total_max == 0 {
        return 0;
    }
    (criterion_max as f64 / total_max as f64 * marks_awarded as f64).round() as u32
}

/// Two fixed criteria weighted roughly 60/40.
///
/// The content criterion takes the ceiling of 60% (in integer arithmetic) and
/// the application criterion takes the rest, for both the maximum and the
/// awarded marks, so the synthetic breakdown reconciles exactly too.
fn synthetic_breakdown(max_marks: u32, marks_awarded: u32) -> Vec<CriterionResult> {
    let content_max = ceil_sixty_percent(max_marks);
    let content_marks = ceil_sixty_percent(marks_awarded);

    let parts = [
        (
            CONTENT_CRITERION,
            content_marks,
            content_max,
            "Understanding of the key concepts",
        ),
        (
            APPLICATION_CRITERION,
            marks_awarded - content_marks,
            max_marks - content_max,
            "Use of relevant examples and application of knowledge",
        ),
    ];

    parts
        .into_iter()
        .map(|(name, marks, max, description)| CriterionResult {
            name: name.to_string(),
            marks_awarded: marks,
            max_marks: max,
            feedback: criterion_feedback(marks, max, Some(description)),
        })
        .collect()
}

fn ceil_sixty_percent(value: u32) -> u32 {
    // At most 0.6 * value, so the narrowing is lossless.
    (u64::from(value) * 6).div_ceil(10) as u32
}

/// Feedback line for one criterion, banded on the share of its marks earned.
///
/// Bands compare the unrounded ratio, so 89.7% is still "Good".
pub fn criterion_feedback(marks: u32, max: u32, description: Option<&str>) -> String {
    let ratio = if max == 0 {
        0.0
    } else {
        marks as f64 / max as f64 * 100.0
    };
    let band = if ratio >= 90.0 {
        "Excellent"
    } else if ratio >= 75.0 {
        "Good"
    } else if ratio >= 60.0 {
        "Satisfactory"
    } else if ratio >= 40.0 {
        "Needs improvement"
    } else {
        "Insufficient"
    };
    match description {
        Some(d) if !d.trim().is_empty() => format!("{band}: {}", d.trim()),
        _ => format!("{band} performance on this criterion"),
    }
}
