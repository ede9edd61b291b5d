//! Manr - a manual page finder and viewer
//!
//! This library resolves a manual query (page name, optional section and
//! architecture) to documents on disk, ranks them, renders them and shows
//! the result on standard output or through a pager under job control.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod delivery;
pub mod index;
pub mod manpage;
pub mod output;
pub mod query;
pub mod render;
pub mod resolve;
pub mod search_path;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ManrError {
    /// Pager or output delivery error
    #[error("{0}")]
    Delivery(#[from] delivery::DeliveryError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ManrError {
    /// Exit level this error ends the run with
    #[must_use]
    pub const fn level(&self) -> ExitLevel {
        match self {
            Self::InvalidInput(_) | Self::ConfigError(_) => ExitLevel::BadArg,
            _ => ExitLevel::SysErr,
        }
    }
}

/// Severity of a run, mapped to the process exit status
///
/// Levels are ordered; the worst level seen during a run wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ExitLevel {
    #[default]
    Ok = 0,
    /// A rendered page has style problems
    Style = 1,
    Warning = 2,
    /// An input could not be opened or rendered
    Error = 3,
    /// Nothing matched, or the arguments were bad
    BadArg = 5,
    /// A system call failed
    SysErr = 6,
}

impl ExitLevel {
    /// Raise `self` to `other` if that is worse
    pub fn raise(&mut self, other: Self) {
        *self = (*self).max(other);
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}
