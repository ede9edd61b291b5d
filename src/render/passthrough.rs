//! Preformatted page passthrough
//!
//! Cached pages are already formatted and are copied as they are. With
//! `synopsis_only`, only the indented block below the SYNOPSIS heading is
//! copied, with its indentation removed.

use std::io::{BufRead, Write};

use super::error::{RenderError, Result};

const SYNOPSIS: &str = "SYNOPSIS";

/// Remove backspace overstrike, keeping the last character of each group
///
/// Formatted pages spell bold as `S\bS` and underline as `_\bS`.
#[must_use]
pub fn plain_text(line: &str) -> String {
    let mut text = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\u{8}' {
            text.pop();
        } else {
            text.push(c);
        }
    }
    text
}

fn is_synopsis_heading(line: &[u8]) -> bool {
    let line = String::from_utf8_lossy(line);
    plain_text(line.trim_end_matches(['\n', '\r'])) == SYNOPSIS
}

/// Copy a preformatted page
///
/// # Errors
/// Returns `RenderError::Input` if reading fails and `RenderError::Output`
/// if writing fails.
pub fn passthrough<R: BufRead>(mut input: R, out: &mut dyn Write, synopsis_only: bool) -> Result<()> {
    let mut in_synopsis = false;
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).map_err(RenderError::Input)? == 0 {
            break;
        }

        let mut text = line.as_slice();
        if synopsis_only {
            if !in_synopsis {
                in_synopsis = is_synopsis_heading(text);
                continue;
            }
            if !text.first().is_some_and(u8::is_ascii_whitespace) {
                break;
            }
            text = text.trim_ascii_start();
        }
        out.write_all(text).map_err(RenderError::Output)?;
    }
    out.flush().map_err(RenderError::Output)
}
