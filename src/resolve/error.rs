//! Resolver error types
//!
//! Errors here never abort a lookup. The resolver reports them and moves on
//! to the next probe, since one unreadable directory must not hide pages in
//! the others.

use thiserror::Error;

/// Errors raised while probing manual trees
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// Directory could not be read while expanding a glob
    #[error("{pattern}: glob: {reason}")]
    GlobRead { pattern: String, reason: String },
}

impl ResolveError {
    #[must_use]
    pub fn invalid_glob(pattern: &str, reason: &str) -> Self {
        Self::InvalidGlob {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;
