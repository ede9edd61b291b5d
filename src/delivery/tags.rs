//! Tag coordination file
//!
//! Tag-aware pagers read a ctags-style file (`-T`) and jump to an entry by
//! name (`-t`). The entry for the requested term points at the first line of
//! the rendered output whose first word is that term.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::render::plain_text;

/// Line number (1-based) of the first line whose first word is `tag`
///
/// Overstrike sequences are removed before comparing, so bold or
/// underlined terms still match.
///
/// # Errors
/// Returns `io::Error` if reading fails.
pub fn find_tag_line<R: BufRead>(reader: R, tag: &str) -> io::Result<Option<usize>> {
    for (number, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let text = plain_text(&String::from_utf8_lossy(&line));
        if text.split_whitespace().next() == Some(tag) {
            return Ok(Some(number + 1));
        }
    }
    Ok(None)
}

/// Append one tag entry
///
/// # Errors
/// Returns `io::Error` if writing fails.
pub fn write_entry<W: Write>(mut writer: W, tag: &str, output: &Path, line: usize) -> io::Result<()> {
    writeln!(writer, "{tag}\t{}\t{line}", output.display())
}
