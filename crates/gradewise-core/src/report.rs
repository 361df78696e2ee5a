//! Grading runs with JSON persistence and regression detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::GradingReport;
use crate::scoring::Grade;
use crate::statistics::RunStatistics;

/// A complete batch grading run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Summary of the question bank.
    pub bank: BankSummary,
    /// Graded submissions, in submission order.
    pub records: Vec<GradingRecord>,
    /// Submissions that could not be graded.
    #[serde(default)]
    pub failures: Vec<GradingFailure>,
    pub statistics: RunStatistics,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question bank (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// One graded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRecord {
    pub submission_id: String,
    pub question_id: String,
    #[serde(default)]
    pub learner_id: Option<String>,
    pub report: GradingReport,
}

/// A submission that could not be graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingFailure {
    pub submission_id: String,
    pub question_id: String,
    pub message: String,
}

impl GradingRun {
    /// Save the run as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize grading run")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write grading run to {}", path.display()))?;
        Ok(())
    }

    /// Load a run from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read grading run from {}", path.display()))?;
        let run: GradingRun =
            serde_json::from_str(&content).context("failed to parse grading run JSON")?;
        Ok(run)
    }

    /// Compare this run against a baseline, matching records by submission ID.
    ///
    /// `threshold` is in percentage points; changes within it count as unchanged.
    pub fn compare(&self, baseline: &GradingRun, threshold: f64) -> RegressionReport {
        let index = |run: &GradingRun| -> HashMap<String, (String, u32, Grade)> {
            run.records
                .iter()
                .map(|r| {
                    (
                        r.submission_id.clone(),
                        (r.question_id.clone(), r.report.percentage, r.report.grade),
                    )
                })
                .collect()
        };

        let baseline_scores = index(baseline);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_submissions = 0usize;

        // Walk current records in order so the output is stable.
        for record in &self.records {
            let Some((_, baseline_pct, baseline_grade)) =
                baseline_scores.get(&record.submission_id)
            else {
                new_submissions += 1;
                continue;
            };

            let current_pct = record.report.percentage;
            let delta = current_pct as i64 - *baseline_pct as i64;
            let change = ScoreChange {
                submission_id: record.submission_id.clone(),
                question_id: record.question_id.clone(),
                baseline_percentage: *baseline_pct,
                current_percentage: current_pct,
                baseline_grade: *baseline_grade,
                current_grade: record.report.grade,
                delta,
            };

            if (delta as f64) < -threshold {
                regressions.push(change);
            } else if (delta as f64) > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let current_ids: std::collections::HashSet<&str> = self
            .records
            .iter()
            .map(|r| r.submission_id.as_str())
            .collect();
        let removed_submissions = baseline_scores
            .keys()
            .filter(|id| !current_ids.contains(id.as_str()))
            .count();

        RegressionReport {
            regressions,
            improvements,
            unchanged,
            new_submissions,
            removed_submissions,
        }
    }
}

/// Result of comparing two runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Submissions whose percentage went down.
    pub regressions: Vec<ScoreChange>,
    /// Submissions whose percentage went up.
    pub improvements: Vec<ScoreChange>,
    /// Submissions with no significant change.
    pub unchanged: usize,
    /// Submissions in current but not baseline.
    pub new_submissions: usize,
    /// Submissions in baseline but not current.
    pub removed_submissions: usize,
}

/// A significant change in one submission's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub submission_id: String,
    pub question_id: String,
    pub baseline_percentage: u32,
    pub current_percentage: u32,
    pub baseline_grade: Grade,
    pub current_grade: Grade,
    /// Percentage points, current minus baseline.
    pub delta: i64,
}

impl RegressionReport {
    /// Format the regression report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged, {} new, {} removed\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged,
            self.new_submissions,
            self.removed_submissions
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Submission | Question | Baseline | Current | Delta |\n");
            md.push_str("|------------|----------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {}% ({}) | {}% ({}) | {:+} |\n",
                    c.submission_id,
                    c.question_id,
                    c.baseline_percentage,
                    c.baseline_grade,
                    c.current_percentage,
                    c.current_grade,
                    c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
