//! Output helpers: results go to stdout as pretty JSON, status lines to
//! stderr.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::CliError;

/// Pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print a result to stdout, respecting quiet mode.
pub fn print_json<T: Serialize + ?Sized>(data: &T, quiet: bool) -> Result<(), CliError> {
    if quiet {
        return Ok(());
    }
    let rendered = render_json(data)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

/// Print a one-line status message to stderr, respecting quiet mode.
pub fn status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}
