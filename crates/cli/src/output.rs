//! Step outputs and failure annotations in the GitHub Actions format.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use lifecycle::IssueNumber;

pub const ISSUE_NUMBER_OUTPUT: &str = "issue-number";

/// Appends `issue-number=<n>` to the outputs file, or prints the number to
/// stdout when there is none.
pub fn emit_issue_number(number: IssueNumber, outputs_file: Option<&Path>) -> Result<()> {
    match outputs_file.filter(|path| !path.as_os_str().is_empty()) {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open outputs file {}", path.display()))?;
            writeln!(file, "{ISSUE_NUMBER_OUTPUT}={number}")
                .with_context(|| format!("failed to write outputs file {}", path.display()))?;
        }
        None => println!("{number}"),
    }
    Ok(())
}

/// Flattens an error chain into one line, skipping causes whose text the
/// outer message already contains.
pub fn error_message(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

/// A workflow command that marks the step as failed with `message`.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
