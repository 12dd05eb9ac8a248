use anyhow::{Context, Result};
use std::io::Write;

use crate::transcript::ExtractionOutcome;

/// Serialize an outcome; non-ASCII text is kept literal
pub fn render(outcome: &ExtractionOutcome, pretty: bool) -> Result<String> {
    let content = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };

    content.context("Failed to serialize outcome")
}

/// Print an outcome as a single JSON object on stdout
pub fn print_outcome(outcome: &ExtractionOutcome, pretty: bool) -> Result<()> {
    let content = render(outcome, pretty)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", content)?;
    stdout.flush()?;
    Ok(())
}
