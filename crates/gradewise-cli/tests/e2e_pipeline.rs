//! End-to-end pipeline tests over the bundled question banks.
//!
//! These tests drive the whole flow (parse banks and submissions, batch
//! grade, persist, render) the same way the `batch` command does.

use std::path::Path;

use gradewise_core::config::GradingConfig;
use gradewise_core::engine::{BatchGrader, NoopReporter};
use gradewise_core::model::QuestionBank;
use gradewise_core::parser::{load_bank_directory, parse_submissions};
use gradewise_core::report::GradingRun;
use gradewise_core::{Grade, Grader};
use gradewise_report::html::write_html_report;

fn merged_bank() -> QuestionBank {
    let banks = load_bank_directory(Path::new("../../question-banks")).unwrap();
    assert_eq!(banks.len(), 2);
    QuestionBank {
        id: "all".into(),
        name: "All banks".into(),
        description: String::new(),
        questions: banks.into_iter().flat_map(|b| b.questions).collect(),
    }
}

async fn run_with(config: GradingConfig, parallelism: usize) -> GradingRun {
    let submissions = parse_submissions(Path::new("../../submissions/biology.toml")).unwrap();
    BatchGrader::new(Grader::new(config).unwrap(), parallelism)
        .run(&merged_bank(), &submissions, &NoopReporter)
        .await
        .unwrap()
}

#[tokio::test]
async fn e2e_batch_over_bundled_banks() {
    let run = run_with(GradingConfig::default(), 3).await;

    assert_eq!(run.bank.question_count, 5);
    let ids: Vec<&str> = run.records.iter().map(|r| r.submission_id.as_str()).collect();
    assert_eq!(ids, vec!["sub-001", "sub-002", "sub-003", "sub-005"]);
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].submission_id, "sub-004");

    for record in &run.records {
        let report = &record.report;
        assert_eq!(report.breakdown_total(), report.marks_awarded);
        assert!(report.marks_awarded <= report.max_marks);
        assert!(!report.strengths.is_empty());
        assert!(!report.improvements.is_empty());
        assert!(report.suggested_resources.len() >= 3);
    }
}

#[tokio::test]
async fn e2e_scores_follow_the_heuristic() {
    let run = run_with(GradingConfig::default(), 2).await;
    let by_id = |id: &str| {
        &run.records
            .iter()
            .find(|r| r.submission_id == id)
            .unwrap()
            .report
    };

    // Covers most of the reference and scheme vocabulary.
    let strong = by_id("sub-001");
    assert!(strong.marks_awarded >= 6, "got {}", strong.marks_awarded);
    assert!(strong.grade >= Grade::C);
    assert!(strong
        .strengths
        .contains(&"Organized the answer into clear paragraphs".to_string()));
    assert!(strong.strengths.contains(&"Supported points with examples".to_string()));

    // Short, off-vocabulary, but substantive.
    let floor = by_id("sub-002");
    assert_eq!(floor.marks_awarded, 1);
    assert_eq!(floor.percentage, 10);

    // Every reference keyword from the structured answer, short response.
    let osmosis = by_id("sub-003");
    assert_eq!(osmosis.marks_awarded, 4);
    assert_eq!(osmosis.grade, Grade::A);
    assert_eq!(osmosis.breakdown[0].name, "Content Understanding");

    let empty = by_id("sub-005");
    assert_eq!(empty.marks_awarded, 0);
    assert_eq!(empty.grade, Grade::F);
    assert_eq!(empty.breakdown.len(), 2);
    assert_eq!(empty.breakdown[0].name, "Stages");
}

#[tokio::test]
async fn e2e_results_do_not_depend_on_parallelism() {
    let serial = run_with(GradingConfig::default(), 1).await;
    let parallel = run_with(GradingConfig::default(), 8).await;
    assert_eq!(serial.records, parallel.records);
    assert_eq!(serial.statistics, parallel.statistics);
}

#[tokio::test]
async fn e2e_persist_and_render() {
    let run = run_with(GradingConfig::default(), 2).await;
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("run.json");
    run.save_json(&json_path).unwrap();
    let loaded = GradingRun::load_json(&json_path).unwrap();
    assert_eq!(loaded.records, run.records);
    assert_eq!(loaded.failures, run.failures);

    let html_path = dir.path().join("run.html");
    write_html_report(&loaded, &html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("sub-001"));
    assert!(html.contains("unknown question"));
    assert!(html.contains("Grade distribution"));
}
