//! Aggregate statistics over a grading run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::GradingRecord;
use crate::scoring::Grade;

/// Summary of a set of graded responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of graded responses.
    pub count: usize,
    pub mean_percentage: f64,
    pub median_percentage: f64,
    pub min_percentage: u32,
    pub max_percentage: u32,
    /// Sum of marks awarded.
    pub total_marks_awarded: u64,
    /// Sum of marks available.
    pub total_max_marks: u64,
    /// Response count per grade letter. Grades nobody received are omitted.
    pub grade_distribution: BTreeMap<String, usize>,
}

impl ScoreSummary {
    /// Summarize the given reports' percentages and grades.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a GradingRecord>) -> Self {
        let mut percentages = Vec::new();
        let mut summary = ScoreSummary::default();

        for record in records {
            let report = &record.report;
            percentages.push(report.percentage);
            summary.total_marks_awarded += report.marks_awarded as u64;
            summary.total_max_marks += report.max_marks as u64;
            *summary
                .grade_distribution
                .entry(report.grade.to_string())
                .or_default() += 1;
        }

        if percentages.is_empty() {
            return summary;
        }

        percentages.sort_unstable();
        let n = percentages.len();
        summary.count = n;
        summary.mean_percentage = percentages.iter().map(|&p| p as f64).sum::<f64>() / n as f64;
        summary.median_percentage = if n % 2 == 0 {
            (percentages[n / 2 - 1] + percentages[n / 2]) as f64 / 2.0
        } else {
            percentages[n / 2] as f64
        };
        summary.min_percentage = percentages[0];
        summary.max_percentage = percentages[n - 1];
        summary
    }

    /// Count for one grade, zero when absent.
    pub fn grade_count(&self, grade: Grade) -> usize {
        self.grade_distribution
            .get(grade.as_str())
            .copied()
            .unwrap_or(0)
    }
}

/// Overall and per-question statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub overall: ScoreSummary,
    /// Keyed by question ID.
    pub per_question: BTreeMap<String, ScoreSummary>,
}

/// Compute statistics from graded records.
pub fn compute_run_statistics(records: &[GradingRecord]) -> RunStatistics {
    let mut by_question: BTreeMap<&str, Vec<&GradingRecord>> = BTreeMap::new();
    for record in records {
        by_question
            .entry(record.question_id.as_str())
            .or_default()
            .push(record);
    }

    let per_question = by_question
        .into_iter()
        .map(|(question_id, group)| {
            (question_id.to_string(), ScoreSummary::from_records(group))
        })
        .collect();

    RunStatistics {
        overall: ScoreSummary::from_records(records),
        per_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::GradingReport;

    fn record(question_id: &str, marks: u32, max: u32) -> GradingRecord {
        let percentage = crate::scoring::percentage_of(marks, max);
        GradingRecord {
            submission_id: format!("{question_id}-{marks}"),
            question_id: question_id.into(),
            learner_id: None,
            report: GradingReport {
                marks_awarded: marks,
                max_marks: max,
                percentage,
                grade: Grade::from_percentage(percentage),
                summary_feedback: String::new(),
                strengths: vec!["Attempted the question".into()],
                improvements: vec!["Be more specific in your explanations".into()],
                breakdown: vec![],
                suggested_resources: vec![],
            },
        }
    }

    #[test]
    fn empty_run_has_zero_counts() {
        let stats = compute_run_statistics(&[]);
        assert_eq!(stats.overall.count, 0);
        assert_eq!(stats.overall.mean_percentage, 0.0);
        assert!(stats.per_question.is_empty());
    }

    #[test]
    fn overall_summary() {
        let records = vec![
            record("q1", 10, 10),
            record("q1", 5, 10),
            record("q2", 1, 4),
            record("q2", 3, 4),
        ];
        let stats = compute_run_statistics(&records);
        let overall = &stats.overall;
        assert_eq!(overall.count, 4);
        // 100, 50, 25, 75
        assert!((overall.mean_percentage - 62.5).abs() < f64::EPSILON);
        assert!((overall.median_percentage - 62.5).abs() < f64::EPSILON);
        assert_eq!(overall.min_percentage, 25);
        assert_eq!(overall.max_percentage, 100);
        assert_eq!(overall.total_marks_awarded, 19);
        assert_eq!(overall.total_max_marks, 28);
        assert_eq!(overall.grade_count(Grade::APlus), 1);
        assert_eq!(overall.grade_count(Grade::BPlus), 1);
        assert_eq!(overall.grade_count(Grade::D), 1);
        assert_eq!(overall.grade_count(Grade::F), 1);
        assert_eq!(overall.grade_count(Grade::A), 0);
    }

    #[test]
    fn per_question_grouping() {
        let records = vec![record("q1", 10, 10), record("q2", 0, 4), record("q1", 8, 10)];
        let stats = compute_run_statistics(&records);
        assert_eq!(stats.per_question.len(), 2);
        let q1 = &stats.per_question["q1"];
        assert_eq!(q1.count, 2);
        assert!((q1.median_percentage - 90.0).abs() < f64::EPSILON);
        assert_eq!(stats.per_question["q2"].max_percentage, 0);
    }

    #[test]
    fn distribution_serializes_by_letter() {
        let stats = compute_run_statistics(&[record("q1", 10, 10)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["overall"]["grade_distribution"]["A+"], 1);
    }
}
