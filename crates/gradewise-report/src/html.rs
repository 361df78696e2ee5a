//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use gradewise_core::report::{GradingRecord, GradingRun};
use gradewise_core::statistics::ScoreSummary;
use gradewise_core::Grade;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// CSS class for a percentage band.
fn band_class(percentage: u32) -> &'static str {
    match percentage {
        80.. => "high",
        50..=79 => "mid",
        _ => "low",
    }
}

/// Generate an HTML report from a grading run.
pub fn generate_html(run: &GradingRun) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradewise report: {}</title>\n",
        html_escape(&run.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>gradewise report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Question bank: <strong>{}</strong> | {} questions | {} graded | {} failed | {}</p>\n",
        html_escape(&run.bank.name),
        run.bank.question_count,
        run.records.len(),
        run.failures.len(),
        run.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Responses</th><th>Mean %</th><th>Median %</th><th>Min %</th><th>Max %</th><th>Marks</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (question_id, summary) in &run.statistics.per_question {
        html.push_str(&summary_row(&html_escape(question_id), summary));
    }
    html.push_str(&summary_row("<strong>All</strong>", &run.statistics.overall));
    html.push_str("</tbody></table>\n");

    if run.statistics.overall.count > 0 {
        html.push_str("<h3>Grade distribution</h3>\n");
        html.push_str(&generate_grade_chart(&run.statistics.overall));
    }
    html.push_str("</section>\n");

    // Per-submission results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Submission</th><th onclick=\"sortTable(1)\">Learner</th><th onclick=\"sortTable(2)\">Question</th><th onclick=\"sortTable(3)\">Marks</th><th onclick=\"sortTable(4)\">%</th><th onclick=\"sortTable(5)\">Grade</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for record in &run.records {
        let report = &record.report;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}/{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&record.submission_id),
            html_escape(record.learner_id.as_deref().unwrap_or("-")),
            html_escape(&record.question_id),
            report.marks_awarded,
            report.max_marks,
            band_class(report.percentage),
            report.percentage,
            report.grade
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Feedback
    if !run.records.is_empty() {
        html.push_str("<section class=\"feedback\">\n");
        html.push_str("<h2>Feedback</h2>\n");
        for record in &run.records {
            html.push_str(&feedback_details(record));
        }
        html.push_str("</section>\n");
    }

    if !run.failures.is_empty() {
        html.push_str("<section class=\"failures\">\n");
        html.push_str("<h2>Failures</h2>\n<ul>\n");
        for failure in &run.failures {
            html.push_str(&format!(
                "<li class=\"low\"><strong>{}</strong> ({}): {}</li>\n",
                html_escape(&failure.submission_id),
                html_escape(&failure.question_id),
                html_escape(&failure.message)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(run).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(run: &GradingRun, path: &Path) -> Result<()> {
    let html = generate_html(run);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn summary_row(label: &str, summary: &ScoreSummary) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{}/{}</td></tr>\n",
        label,
        summary.count,
        summary.mean_percentage,
        summary.median_percentage,
        summary.min_percentage,
        summary.max_percentage,
        summary.total_marks_awarded,
        summary.total_max_marks
    )
}

fn feedback_details(record: &GradingRecord) -> String {
    let report = &record.report;
    let mut out = format!(
        "<details>\n<summary>{} ({}): {} ({}%)</summary>\n",
        html_escape(&record.submission_id),
        html_escape(&record.question_id),
        report.grade,
        report.percentage
    );
    out.push_str(&format!("<p>{}</p>\n", html_escape(&report.summary_feedback)));

    for (title, items) in [
        ("Strengths", &report.strengths),
        ("Improvements", &report.improvements),
        ("Suggested resources", &report.suggested_resources),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("<h4>{title}</h4>\n<ul>\n"));
        for item in items {
            out.push_str(&format!("<li>{}</li>\n", html_escape(item)));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("<table class=\"breakdown\">\n<thead><tr><th>Criterion</th><th>Marks</th><th>Feedback</th></tr></thead>\n<tbody>\n");
    for criterion in &report.breakdown {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}/{}</td><td>{}</td></tr>\n",
            html_escape(&criterion.name),
            criterion.marks_awarded,
            criterion.max_marks,
            html_escape(&criterion.feedback)
        ));
    }
    out.push_str("</tbody></table>\n</details>\n");
    out
}

/// Horizontal bar per grade, highest grade first.
fn generate_grade_chart(summary: &ScoreSummary) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 60;

    let grades = Grade::all();
    let largest = grades
        .iter()
        .map(|g| summary.grade_count(*g))
        .max()
        .unwrap_or(0)
        .max(1);

    let total_height = grades.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, grade) in grades.iter().enumerate() {
        let count = summary.grade_count(*grade);
        let y = i * (bar_height + padding) + padding;
        let width = count * max_width / largest;

        let color = match grade {
            Grade::APlus | Grade::A => "#22c55e",
            Grade::BPlus | Grade::B => "#84cc16",
            Grade::CPlus | Grade::C => "#eab308",
            Grade::D => "#f97316",
            Grade::F => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            grade
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --high: #dcfce7; --mid: #fef9c3; --low: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --high: #064e3b; --mid: #713f12; --low: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.high { background: var(--high); }
.mid { background: var(--mid); }
.low { background: var(--low); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
