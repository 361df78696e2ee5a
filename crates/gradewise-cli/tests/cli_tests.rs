//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gradewise() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("gradewise").unwrap()
}

#[test]
fn validate_valid_bank() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg("../../question-banks/biology.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn validate_directory_reports_warnings() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg("../../question-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Biology 101"))
        .stdout(predicate::str::contains("Physics 101"))
        .stdout(predicate::str::contains("[velocity] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    gradewise()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_substantive_attempt_gets_floor_mark() {
    gradewise()
        .args(["grade", "--bank", "../../question-banks/biology.toml"])
        .args(["--question", "photosynthesis"])
        .args(["--response", "Plants are green and grow tall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marks: 1/10 (10%)  Grade: F"))
        .stdout(predicate::str::contains("Mechanism"))
        .stdout(predicate::str::contains("Review the topic: Plant biology"));
}

#[test]
fn grade_empty_response() {
    gradewise()
        .args(["grade", "--bank", "../../question-banks/biology.toml"])
        .args(["--question", "photosynthesis", "--response", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marks: 0/10 (0%)  Grade: F"));
}

#[test]
fn grade_json_output() {
    let output = gradewise()
        .args(["grade", "--bank", "../../question-banks/biology.toml"])
        .args(["--question", "osmosis", "--format", "json"])
        .args([
            "--response",
            "Osmosis is when water moves across a membrane, for example into root hair cells.",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["maxMarks"], 5);
    assert!(json["marksAwarded"].as_u64().unwrap() >= 1);
    let breakdown = json["breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0]["name"], "Content Understanding");
    let total: u64 = breakdown
        .iter()
        .map(|c| c["marksAwarded"].as_u64().unwrap())
        .sum();
    assert_eq!(total, json["marksAwarded"].as_u64().unwrap());
}

#[test]
fn grade_explain_shows_keyword_source() {
    gradewise()
        .args(["grade", "--bank", "../../question-banks/physics.toml"])
        .args(["--question", "velocity", "--explain"])
        .args(["--response", "The average velocity is 4 metres per second."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expected keywords from: question-text"))
        .stdout(predicate::str::contains("Matched: average, velocity"));
}

#[test]
fn grade_response_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answer.txt");
    std::fs::write(&path, "Newton's first law: an object remains at rest unless acted upon by a force.").unwrap();

    gradewise()
        .args(["grade", "--bank", "../../question-banks/physics.toml"])
        .args(["--question", "newton-first", "--response-file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("/2"));
}

#[test]
fn grade_unknown_question() {
    gradewise()
        .args(["grade", "--bank", "../../question-banks/biology.toml"])
        .args(["--question", "genetics", "--response", "DNA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'genetics' not found"));
}

#[test]
fn grade_zero_max_marks_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let bank = dir.path().join("broken.toml");
    std::fs::write(
        &bank,
        "[bank]\nid = \"b\"\nname = \"B\"\n\n[[questions]]\nid = \"q1\"\ntext = \"Explain\"\nmax_marks = 0\n",
    )
    .unwrap();

    gradewise()
        .args(["grade", "--bank"])
        .arg(&bank)
        .args(["--question", "q1", "--response", "anything at all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn batch_writes_json_and_html() {
    let dir = TempDir::new().unwrap();

    gradewise()
        .args(["batch", "--bank", "../../question-banks"])
        .args(["--submissions", "../../submissions/biology.toml"])
        .args(["--format", "all", "--parallelism", "2", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Complete: 4/5 graded, 1 failed"))
        .stderr(predicate::str::contains("unknown question 'genetics'"));

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(files.iter().any(|f| f.starts_with("run-") && f.ends_with(".json")));
    assert!(files.iter().any(|f| f.starts_with("run-") && f.ends_with(".html")));
}

#[test]
fn batch_rejects_unknown_format() {
    gradewise()
        .args(["batch", "--bank", "../../question-banks"])
        .args(["--submissions", "../../submissions/biology.toml"])
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'pdf'"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradewise.toml"))
        .stdout(predicate::str::contains("Created question-banks/example.toml"))
        .stdout(predicate::str::contains("Created submissions/example.toml"));

    assert!(dir.path().join("gradewise.toml").exists());
    assert!(dir.path().join("question-banks/example.toml").exists());
    assert!(dir.path().join("submissions/example.toml").exists());

    // The generated files work together.
    gradewise()
        .current_dir(dir.path())
        .args(["validate", "--bank", "question-banks/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    gradewise().current_dir(dir.path()).arg("init").assert().success();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn compare_nonexistent_run() {
    gradewise()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    gradewise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Heuristic grading and feedback"));
}

#[test]
fn version_output() {
    gradewise()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradewise"));
}
