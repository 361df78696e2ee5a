//! gradewise-report — Report rendering for grading runs.

pub mod html;

pub use html::{generate_html, write_html_report};
