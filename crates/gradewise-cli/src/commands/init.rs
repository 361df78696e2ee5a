//! The `gradewise init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("gradewise.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("question-banks")?;
    write_if_missing(Path::new("question-banks/example.toml"), EXAMPLE_BANK)?;

    std::fs::create_dir_all("submissions")?;
    write_if_missing(Path::new("submissions/example.toml"), EXAMPLE_SUBMISSIONS)?;

    println!("\nNext steps:");
    println!("  1. Run: gradewise validate --bank question-banks/example.toml");
    println!(
        "  2. Run: gradewise grade --bank question-banks/example.toml --question photosynthesis --response \"...\""
    );
    println!(
        "  3. Run: gradewise batch --bank question-banks --submissions submissions/example.toml --format all"
    );

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradewise configuration

parallelism = 4
output_dir = "./gradewise-results"

[grading]
# Responses at or above this many characters get full length credit.
target_length = 500
# Weights of the length and keyword signals; must sum to 1.
length_weight = 0.3
keyword_weight = 0.7
# Responses longer than this never score zero.
substantive_length = 10
# Tokens shorter than this are ignored when matching keywords.
min_token_length = 4
# Words to ignore in addition to the built-in stopwords.
extra_stopwords = []
# Upper bound on suggested study resources (at least 3).
max_resources = 6
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "biology-101"
name = "Biology 101"
description = "Introductory plant and cell biology"

[[questions]]
id = "photosynthesis"
text = "Explain how photosynthesis converts light energy into chemical energy."
max_marks = 10
topic = "Plant biology"
type = "essay"
reference_answer = "Photosynthesis converts sunlight into chemical energy using chlorophyll in the chloroplasts, producing glucose and oxygen from carbon dioxide and water."

[[questions.marking_scheme]]
name = "Mechanism"
max_marks = 4
description = "Light reactions and the Calvin cycle"

[[questions.marking_scheme]]
name = "Examples"
max_marks = 3
description = "Relevant plant examples"

[[questions.marking_scheme]]
name = "Limiting factors"
max_marks = 3
description = "Light intensity, temperature, carbon dioxide concentration"

[[questions]]
id = "osmosis"
text = "Define osmosis and describe one example in living cells."
max_marks = 5
topic = "Cell biology"
type = "short-answer"

[questions.reference_answer]
definition = "Osmosis is the movement of water across a partially permeable membrane from a dilute solution to a concentrated solution."
example = "Root hair cells absorb water from the soil"
"#;

const EXAMPLE_SUBMISSIONS: &str = r#"[[submissions]]
id = "sub-001"
question_id = "photosynthesis"
learner_id = "learner-a"
response = """
Photosynthesis happens in the chloroplasts of plant cells. Chlorophyll absorbs sunlight and the energy is used to turn carbon dioxide and water into glucose, releasing oxygen.

For example, the leaves of a sunflower grow faster in bright light because the light reactions run faster.
"""

[[submissions]]
id = "sub-002"
question_id = "photosynthesis"
learner_id = "learner-b"
response = "Plants make food from light."

[[submissions]]
id = "sub-003"
question_id = "osmosis"
learner_id = "learner-a"
response = "Osmosis is when water moves through a membrane from a dilute solution to a concentrated one, such as in root hair cells."
"#;
