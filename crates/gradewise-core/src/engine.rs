//! Grading orchestrator and batch engine.
//!
//! `Grader` composes keyword extraction, scoring, feedback, mark allocation
//! and resource suggestions into one pure call. `BatchGrader` fans a set of
//! submissions out over a bounded worker pool and collects a `GradingRun`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::allocation::allocate;
use crate::config::GradingConfig;
use crate::error::GradingError;
use crate::feedback::compose_feedback;
use crate::keywords::{match_keywords, KeywordExtractor};
use crate::model::{QuestionBank, QuestionSpec, Submission};
use crate::report::{BankSummary, GradingFailure, GradingRecord, GradingRun};
use crate::resources::recommend_resources;
use crate::results::{GradingOutcome, GradingReport};
use crate::scoring::{score_response, Grade};
use crate::sources::ExpectedKeywordBuilder;
use crate::statistics::compute_run_statistics;

/// The grading orchestrator.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and used for any number of concurrent calls.
pub struct Grader {
    config: GradingConfig,
    extractor: KeywordExtractor,
    expected: ExpectedKeywordBuilder,
}

impl Grader {
    /// Build a grader with the standard keyword-source chain.
    pub fn new(config: GradingConfig) -> Result<Self, GradingError> {
        let expected = ExpectedKeywordBuilder::from_config(&config);
        Self::with_sources(config, expected)
    }

    /// Build a grader with a custom keyword-source chain.
    pub fn with_sources(
        config: GradingConfig,
        expected: ExpectedKeywordBuilder,
    ) -> Result<Self, GradingError> {
        config.validate()?;
        let extractor = KeywordExtractor::new()
            .with_min_token_length(config.min_token_length)
            .with_extra_stopwords(&config.extra_stopwords);
        Ok(Self {
            config,
            extractor,
            expected,
        })
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade a response and return only the report.
    pub fn grade(
        &self,
        question: &QuestionSpec,
        response: &str,
    ) -> Result<GradingReport, GradingError> {
        self.evaluate(question, response).map(|outcome| outcome.report)
    }

    /// Grade a response and keep the intermediate signals.
    pub fn evaluate(
        &self,
        question: &QuestionSpec,
        response: &str,
    ) -> Result<GradingOutcome, GradingError> {
        question.validate()?;

        let expected = self.expected.build(question, &self.extractor);
        let response_keywords = self.extractor.extract(response);
        let keywords = match_keywords(&expected.keywords, &response_keywords);

        let quality = score_response(
            response,
            keywords.match_score,
            question.max_marks,
            &self.config,
        );
        let grade = Grade::from_percentage(quality.percentage);

        tracing::debug!(
            question = %question.id,
            length_score = quality.length_score,
            match_score = quality.match_score,
            raw_marks = quality.raw_marks,
            marks = quality.marks_awarded,
            floor = quality.floor_applied,
            "scored response"
        );

        let feedback = compose_feedback(response, &keywords, quality.percentage, &self.config);
        let breakdown = allocate(question, quality.marks_awarded);
        let suggested_resources =
            recommend_resources(question, &keywords.missing, self.config.max_resources);

        let report = GradingReport {
            marks_awarded: quality.marks_awarded,
            max_marks: question.max_marks,
            percentage: quality.percentage,
            grade,
            summary_feedback: feedback.summary,
            strengths: feedback.strengths,
            improvements: feedback.improvements,
            breakdown,
            suggested_resources,
        };

        Ok(GradingOutcome {
            report,
            keywords,
            quality,
            expected_source: expected.source,
        })
    }
}

impl Default for Grader {
    fn default() -> Self {
        Self {
            config: GradingConfig::default(),
            extractor: KeywordExtractor::new(),
            expected: ExpectedKeywordBuilder::default(),
        }
    }
}

/// Grade one response with the default configuration.
pub fn grade(question: &QuestionSpec, response: &str) -> Result<GradingReport, GradingError> {
    Grader::default().grade(question, response)
}

/// Progress reporting trait for batch runs.
pub trait ProgressReporter: Send + Sync {
    fn on_grade_complete(&self, record: &GradingRecord);
    fn on_grade_error(&self, submission_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_grade_complete(&self, _: &GradingRecord) {}
    fn on_grade_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Grades many submissions with bounded parallelism.
pub struct BatchGrader {
    grader: Arc<Grader>,
    parallelism: usize,
}

impl BatchGrader {
    pub fn new(grader: Grader, parallelism: usize) -> Self {
        Self {
            grader: Arc::new(grader),
            parallelism: parallelism.max(1),
        }
    }

    /// Grade every submission against its question in `bank`.
    ///
    /// Records come back in submission order. Submissions whose question is
    /// unknown or misconfigured are listed as failures.
    pub async fn run(
        &self,
        bank: &QuestionBank,
        submissions: &[Submission],
        progress: &dyn ProgressReporter,
    ) -> Result<GradingRun> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.parallelism));

        tracing::info!(
            bank = %bank.id,
            submissions = submissions.len(),
            parallelism = self.parallelism,
            "starting grading run {run_id}"
        );

        let questions: HashMap<&str, Arc<QuestionSpec>> = bank
            .questions
            .iter()
            .map(|q| (q.id.as_str(), Arc::new(q.clone())))
            .collect();

        let mut failures: Vec<(usize, GradingFailure)> = Vec::new();
        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let Some(question) = questions.get(submission.question_id.as_str()) else {
                let message = format!("unknown question '{}'", submission.question_id);
                tracing::error!("grading failed for {}: {message}", submission.id);
                progress.on_grade_error(&submission.id, &message);
                failures.push((
                    index,
                    GradingFailure {
                        submission_id: submission.id.clone(),
                        question_id: submission.question_id.clone(),
                        message,
                    },
                ));
                continue;
            };

            let grader = Arc::clone(&self.grader);
            let question = Arc::clone(question);
            let semaphore = Arc::clone(&semaphore);
            let submission = submission.clone();

            futures.push(async move {
                let outcome = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    let response = submission.response.clone();
                    let report = tokio::task::spawn_blocking(move || {
                        grader.grade(&question, &response)
                    })
                    .await??;
                    anyhow::Ok(report)
                }
                .await;
                (index, submission, outcome)
            });
        }

        let total = submissions.len();
        let mut records: Vec<(usize, GradingRecord)> = Vec::new();

        while let Some((index, submission, outcome)) = futures.next().await {
            match outcome {
                Ok(report) => {
                    let record = GradingRecord {
                        submission_id: submission.id,
                        question_id: submission.question_id,
                        learner_id: submission.learner_id,
                        report,
                    };
                    progress.on_grade_complete(&record);
                    records.push((index, record));
                }
                Err(e) => {
                    tracing::error!("grading failed for {}: {e:#}", submission.id);
                    progress.on_grade_error(&submission.id, &e.to_string());
                    failures.push((
                        index,
                        GradingFailure {
                            submission_id: submission.id,
                            question_id: submission.question_id,
                            message: format!("{e:#}"),
                        },
                    ));
                }
            }
        }

        records.sort_by_key(|(index, _)| *index);
        failures.sort_by_key(|(index, _)| *index);
        let records: Vec<GradingRecord> = records.into_iter().map(|(_, r)| r).collect();
        let failures: Vec<GradingFailure> = failures.into_iter().map(|(_, f)| f).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, records.len(), failures.len(), elapsed);
        tracing::info!(
            graded = records.len(),
            failed = failures.len(),
            "grading run {run_id} finished in {:.2}s",
            elapsed.as_secs_f64()
        );

        let statistics = compute_run_statistics(&records);

        Ok(GradingRun {
            id: run_id,
            created_at: chrono::Utc::now(),
            bank: BankSummary {
                id: bank.id.clone(),
                name: bank.name.clone(),
                question_count: bank.questions.len(),
            },
            records,
            failures,
            statistics,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
