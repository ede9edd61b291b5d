//! User-facing findings of a lookup
//!
//! Diagnostics are not errors: a lookup that produces them still completes,
//! and sibling query terms are unaffected. The orchestrator prints them to
//! standard error prefixed with the program name.

use std::path::PathBuf;
use thiserror::Error;

use crate::ExitLevel;

/// A message about one query term or input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// The requested architecture has no manual layer
    #[error("Unknown architecture \"{0}\".")]
    UnknownArchitecture(String),

    /// No page of that name in any section
    #[error("No entry for {name} in the manual.")]
    NoEntry { name: String },

    /// No page of that name in the requested section
    #[error("No entry for {name} in section {section} of the manual.")]
    NoEntryInSection { name: String, section: String },

    /// The index missed a page that exists on disk
    #[error("outdated index lacks {name}({section}) entry, run makewhatis {}", root.display())]
    StaleIndex {
        name: String,
        section: String,
        root: PathBuf,
    },

    /// A literal path or input could not be opened
    #[error("{}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// A keyword or expression search found nothing
    #[error("nothing appropriate")]
    NothingAppropriate,

    /// A cross reference in a rendered page points nowhere
    #[error("{}:{line}: STYLE: referenced manual not found: Xr {name} {section}{}",
        file.display(),
        if *count > 1 { format!(" ({count} times)") } else { String::new() })]
    BadCrossReference {
        file: PathBuf,
        line: usize,
        name: String,
        section: String,
        count: usize,
    },
}

impl Diagnostic {
    /// Exit level this diagnostic raises the run to, if any
    #[must_use]
    pub const fn level(&self) -> Option<ExitLevel> {
        match self {
            Self::BadCrossReference { .. } => Some(ExitLevel::Style),
            Self::Unreadable { .. } => Some(ExitLevel::Error),
            _ => None,
        }
    }
}
