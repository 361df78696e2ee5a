//! The `gradewise batch` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use gradewise_core::config::load_config_from;
use gradewise_core::engine::{BatchGrader, ProgressReporter};
use gradewise_core::parser;
use gradewise_core::report::{GradingRecord, GradingRun};
use gradewise_core::{Grade, Grader};
use gradewise_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_grade_complete(&self, record: &GradingRecord) {
        eprintln!(
            "  Graded: {} :: {} {}/{} ({})",
            record.submission_id,
            record.question_id,
            record.report.marks_awarded,
            record.report.max_marks,
            record.report.grade
        );
    }

    fn on_grade_error(&self, submission_id: &str, error: &str) {
        eprintln!("  ERROR: {submission_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} graded, {failed} failed ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    bank_path: PathBuf,
    submissions_path: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    if let Some(bad) = formats.iter().find(|f| !matches!(**f, "json" | "html")) {
        anyhow::bail!("unknown format '{bad}', expected json, html or all");
    }

    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or(config.output_dir);

    let bank = super::load_bank(&bank_path)?;
    let submissions = parser::parse_submissions(&submissions_path)?;

    eprintln!(
        "gradewise v{}: grading {} submissions against {} questions",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        bank.questions.len()
    );
    eprintln!();

    let grader = Grader::new(config.grading)?;
    let run = BatchGrader::new(grader, parallelism)
        .run(&bank, &submissions, &ConsoleReporter)
        .await?;

    print_summary(&run);

    std::fs::create_dir_all(&output)?;
    let timestamp = run.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("run-{timestamp}.json"));
                run.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("run-{timestamp}.html"));
                write_html_report(&run, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            other => anyhow::bail!("unknown format '{other}'"),
        }
    }

    Ok(())
}

fn print_summary(run: &GradingRun) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Question", "Responses", "Mean %", "Median %", "Min %", "Max %", "Marks",
    ]);

    let stats = &run.statistics;
    for (question_id, s) in stats
        .per_question
        .iter()
        .map(|(id, s)| (id.as_str(), s))
        .chain(std::iter::once(("All", &stats.overall)))
    {
        table.add_row(vec![
            Cell::new(question_id),
            Cell::new(s.count),
            Cell::new(format!("{:.1}", s.mean_percentage)),
            Cell::new(format!("{:.1}", s.median_percentage)),
            Cell::new(s.min_percentage),
            Cell::new(s.max_percentage),
            Cell::new(format!("{}/{}", s.total_marks_awarded, s.total_max_marks)),
        ]);
    }

    eprintln!("\n{table}");

    let distribution: Vec<String> = Grade::all()
        .into_iter()
        .map(|g| format!("{g}: {}", stats.overall.grade_count(g)))
        .collect();
    eprintln!("Grades: {}", distribution.join("  "));
}
