//! The `gradewise grade` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use gradewise_core::config::load_config_from;
use gradewise_core::results::GradingOutcome;
use gradewise_core::Grader;

use super::load_bank;

pub fn execute(
    bank_path: PathBuf,
    question_id: String,
    response: Option<String>,
    response_file: Option<PathBuf>,
    format: String,
    explain: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}', expected text or json"
    );

    let config = load_config_from(config_path.as_deref())?;
    let bank = load_bank(&bank_path)?;
    let question = bank
        .find(&question_id)
        .with_context(|| format!("question '{question_id}' not found in {}", bank_path.display()))?;

    let response = match (response, response_file) {
        (Some(text), _) => text,
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read response from stdin")?;
            buf
        }
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read response file: {}", path.display()))?,
        (None, None) => anyhow::bail!("provide --response or --response-file"),
    };

    let grader = Grader::new(config.grading)?;
    let outcome = grader.evaluate(question, &response)?;

    if format == "json" {
        let json = if explain {
            serde_json::to_string_pretty(&outcome)?
        } else {
            serde_json::to_string_pretty(&outcome.report)?
        };
        println!("{json}");
    } else {
        print_text(&outcome, explain);
    }

    Ok(())
}

fn print_text(outcome: &GradingOutcome, explain: bool) {
    let report = &outcome.report;

    println!(
        "Marks: {}/{} ({}%)  Grade: {}",
        report.marks_awarded, report.max_marks, report.percentage, report.grade
    );
    println!("\n{}", report.summary_feedback);

    println!("\nStrengths:");
    for s in &report.strengths {
        println!("  + {s}");
    }
    println!("\nImprovements:");
    for i in &report.improvements {
        println!("  - {i}");
    }

    println!("\nBreakdown:");
    for c in &report.breakdown {
        println!(
            "  {:<28} {:>3}/{:<3} {}",
            c.name, c.marks_awarded, c.max_marks, c.feedback
        );
    }

    println!("\nSuggested resources:");
    for r in &report.suggested_resources {
        println!("  * {r}");
    }

    if explain {
        let q = &outcome.quality;
        println!("\nExplanation:");
        println!(
            "  Expected keywords from: {}",
            outcome.expected_source.as_deref().unwrap_or("none")
        );
        println!("  Matched: {}", outcome.keywords.matched.join(", "));
        println!("  Missing: {}", outcome.keywords.missing.join(", "));
        println!(
            "  Length: {} chars (score {:.2})  Match score: {:.2}  Combined: {:.3}",
            q.length, q.length_score, q.match_score, q.combined_score
        );
        println!(
            "  Raw marks: {}{}",
            q.raw_marks,
            if q.floor_applied {
                " (raised to 1 for a substantive attempt)"
            } else {
                ""
            }
        );
    }
}
