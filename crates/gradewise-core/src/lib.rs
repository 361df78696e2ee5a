//! gradewise-core — Heuristic grading engine, data model, and batch runs.
//!
//! This crate scores free-text responses against a question's reference
//! material and marking scheme, explains the result, and grades whole
//! submission sets in parallel.

pub mod allocation;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod report;
pub mod resources;
pub mod results;
pub mod scoring;
pub mod sources;
pub mod statistics;

pub use engine::{grade, BatchGrader, Grader, NoopReporter, ProgressReporter};
pub use error::GradingError;
pub use model::{Criterion, QuestionBank, QuestionSpec, QuestionType, ReferenceContent, Submission};
pub use results::{CriterionResult, GradingOutcome, GradingReport};
pub use scoring::Grade;
