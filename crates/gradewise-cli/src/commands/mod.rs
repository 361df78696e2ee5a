pub mod batch;
pub mod compare;
pub mod grade;
pub mod init;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use gradewise_core::model::QuestionBank;
use gradewise_core::parser;

/// Load a bank file, or merge every bank in a directory into one.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let mut banks = parser::load_banks(path)?;
    anyhow::ensure!(!banks.is_empty(), "no question banks found in {}", path.display());

    if banks.len() == 1 {
        return Ok(banks.remove(0));
    }

    let ids: Vec<&str> = banks.iter().map(|b| b.id.as_str()).collect();
    tracing::info!("merging {} question banks from {}", banks.len(), path.display());
    let merged = QuestionBank {
        id: ids.join("+"),
        name: format!("{} question banks", banks.len()),
        description: String::new(),
        questions: Vec::new(),
    };
    Ok(banks.into_iter().fold(merged, |mut acc, bank| {
        acc.questions.extend(bank.questions);
        acc
    }))
}
