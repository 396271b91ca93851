//! Confirmation prompts.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, BufRead, Write};

use super::RealRuntime;

/// Asks `prompt` on `output` and reads one answer line from `input`.
/// Only "y" and "yes" (any case) confirm; end of input counts as no.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt).context("Failed to write prompt")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read answer")? == 0 {
        debug!("No answer to {:?}, treating as no", prompt);
        return Ok(false);
    }

    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        confirm_with_io(prompt, &mut stdin.lock(), &mut stdout)
    }
}
