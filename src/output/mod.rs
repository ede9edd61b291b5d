//! Output formatting for CLI display
//!
//! Page separators, list lines for keyword searches, path lines, and the
//! output width.

use std::path::Path;

use colored::Colorize;

use crate::manpage::Candidate;

/// Width used when nothing else decides it
pub const DEFAULT_WIDTH: usize = 78;

/// Terminals narrower than this shrink the output width
const NARROW_TERMINAL: usize = 79;

/// What a run prints for its candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The best-ranked page
    #[default]
    One,
    /// Every candidate, in order
    All,
    /// File paths only
    Paths,
    /// `names(section) - description` lines
    List,
}

impl OutputMode {
    /// Whether this mode renders pages, and so may use the pager
    #[must_use]
    pub const fn renders(self) -> bool {
        matches!(self, Self::One | Self::All)
    }
}

/// Line drawn between consecutive pages
///
/// Each column is an overstruck dash, which pagers show as a bold rule.
#[must_use]
pub fn separator(width: usize) -> String {
    let mut line = "-\u{8}-".repeat(width.max(1));
    line.push('\n');
    line
}

/// Width for a run
///
/// A configured width wins. Otherwise, when paging to a terminal narrower
/// than 79 columns, one less than the terminal width.
#[must_use]
pub fn output_width(configured: Option<usize>, terminal_columns: Option<u16>) -> usize {
    if let Some(width) = configured {
        return width;
    }
    match terminal_columns.map(usize::from) {
        Some(columns) if columns > 1 && columns < NARROW_TERMINAL => columns - 1,
        _ => DEFAULT_WIDTH,
    }
}

/// Columns of the terminal on standard output, if there is one
#[must_use]
pub fn terminal_columns() -> Option<u16> {
    crossterm::terminal::size().ok().map(|(columns, _)| columns)
}

/// Format a candidate as a list line
#[must_use]
pub fn list_line(candidate: &Candidate, color: bool) -> String {
    let names = candidate.display_names();
    let names = if color { names.bold().to_string() } else { names };
    let section = if candidate.section < 10 {
        format!("({})", candidate.section)
    } else {
        String::new()
    };

    match &candidate.description {
        Some(description) => format!("{names}{section} - {description}"),
        None => format!("{names}{section}"),
    }
}

/// Format a candidate's file path
#[must_use]
pub fn path_line(path: &Path, color: bool) -> String {
    if color {
        path.display().to_string().green().to_string()
    } else {
        path.display().to_string()
    }
}
