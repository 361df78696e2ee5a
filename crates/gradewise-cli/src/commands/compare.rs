//! The `gradewise compare` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::report::GradingRun;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = GradingRun::load_json(&baseline_path)?;
    let current = GradingRun::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            for (title, changes) in [
                ("Regressions", &report.regressions),
                ("Improvements", &report.improvements),
            ] {
                if changes.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for c in changes {
                    println!(
                        "  {} ({}) {}% {} -> {}% {} ({:+})",
                        c.submission_id,
                        c.question_id,
                        c.baseline_percentage,
                        c.baseline_grade,
                        c.current_percentage,
                        c.current_grade,
                        c.delta
                    );
                }
            }

            if report.new_submissions > 0 {
                println!("\n{} new submission(s)", report.new_submissions);
            }
            if report.removed_submissions > 0 {
                println!("{} removed submission(s)", report.removed_submissions);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
