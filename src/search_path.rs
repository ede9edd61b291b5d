//! Ordered manual search roots
//!
//! The first root has the highest priority. A search path is built once per
//! run and never changes afterwards.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Roots searched when nothing else is configured
pub const DEFAULT_ROOTS: [&str; 3] = ["/usr/share/man", "/usr/X11R6/man", "/usr/local/man"];

/// Roots consulted by the cross-reference check
pub const BASE_ROOTS: [&str; 2] = ["/usr/share/man", "/usr/X11R6/man"];

/// Inputs that decide the search path of a run
#[derive(Debug, Clone, Default)]
pub struct SearchPathSources<'a> {
    /// Extra roots searched before everything else (`-m`)
    pub auxiliary: Option<&'a str>,
    /// Roots replacing the environment and configuration (`-M`)
    pub explicit: Option<&'a str>,
    /// Value of `MANPATH`
    pub environment: Option<&'a str>,
    /// Roots from the configuration file
    pub configured: &'a [PathBuf],
}

/// Priority-ranked list of manual roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    /// Create a search path from roots as given, without validation
    #[must_use]
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the search path of a run
    ///
    /// Auxiliary roots come first. Then explicit roots if given, else
    /// `MANPATH` (where an empty component stands for the configured or
    /// default roots), else the configured roots, else `DEFAULT_ROOTS`.
    /// Roots that are not directories and repeated roots are dropped.
    #[must_use]
    pub fn assemble(sources: &SearchPathSources<'_>) -> Self {
        let fallback: Vec<PathBuf> = if sources.configured.is_empty() {
            DEFAULT_ROOTS.iter().map(PathBuf::from).collect()
        } else {
            sources.configured.to_vec()
        };

        let mut wanted = Vec::new();
        if let Some(aux) = sources.auxiliary {
            wanted.extend(split_colon_list(aux));
        }

        if let Some(explicit) = sources.explicit {
            wanted.extend(split_colon_list(explicit));
        } else if let Some(env) = sources.environment
            && !env.is_empty()
        {
            for component in env.split(':') {
                if component.is_empty() {
                    wanted.extend(fallback.iter().cloned());
                } else {
                    wanted.push(PathBuf::from(component));
                }
            }
        } else {
            wanted.extend(fallback);
        }

        let mut roots: Vec<PathBuf> = Vec::new();
        for root in wanted {
            let Ok(canonical) = root.canonicalize() else {
                debug!(root = %root.display(), "skipping missing manual root");
                continue;
            };
            if !canonical.is_dir() || roots.contains(&canonical) {
                continue;
            }
            roots.push(canonical);
        }
        Self { roots }
    }

    /// Roots in priority order
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.roots.get(index).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `index` names the lowest-priority root
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.roots.len()
    }
}

fn split_colon_list(list: &str) -> impl Iterator<Item = PathBuf> + '_ {
    list.split(':')
        .filter(|component| !component.is_empty())
        .map(PathBuf::from)
}
