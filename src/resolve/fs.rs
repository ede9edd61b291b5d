//! File system access used by the probes
//!
//! Probes only ever ask two questions: does this path exist, and what is the
//! first path matching this glob. Keeping that behind a trait lets every
//! probe run against an in-memory tree in tests.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::{ResolveError, Result};

/// Read-only view of the manual trees
pub trait ManFs {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Lexicographically first path matching a glob pattern
    ///
    /// # Errors
    /// Returns `ResolveError` if the pattern is invalid.
    fn glob_first(&self, pattern: &str) -> Result<Option<PathBuf>>;
}

impl<T: ManFs + ?Sized> ManFs for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn glob_first(&self, pattern: &str) -> Result<Option<PathBuf>> {
        (**self).glob_first(pattern)
    }
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl ManFs for SystemFs {
    fn exists(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }

    fn glob_first(&self, pattern: &str) -> Result<Option<PathBuf>> {
        let paths =
            glob::glob(pattern).map_err(|e| ResolveError::invalid_glob(pattern, &e.to_string()))?;

        let mut first: Option<PathBuf> = None;
        for entry in paths {
            match entry {
                Ok(path) => {
                    if first.as_ref().is_none_or(|current| path < *current) {
                        first = Some(path);
                    }
                }
                Err(e) => {
                    let err = ResolveError::GlobRead {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    };
                    warn!("{err}");
                }
            }
        }
        Ok(first)
    }
}
