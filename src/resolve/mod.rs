//! Manual resolution
//!
//! Turns a query into candidate documents. The index is asked first; when it
//! has nothing for a name lookup, the manual trees are probed directly:
//!
//! 1. Every root of the search path, highest priority first
//! 2. Every requested section, or the section preference list
//! 3. The probes of `probe::default_probes`, first hit wins
//!
//! With first-match semantics the whole search ends at the first hit.

pub mod diagnostic;
pub mod error;
pub mod fs;
pub mod probe;
pub mod rank;
pub mod xref;

pub use diagnostic::Diagnostic;
pub use error::ResolveError;
pub use fs::{ManFs, SystemFs};
pub use probe::{Hit, Probe, ProbeTarget};
pub use rank::{rank, score};
pub use xref::XrefContext;

use std::path::Path;

use tracing::debug;

use crate::index::IndexResult;
use crate::manpage::{Candidate, MatchKind};
use crate::query::{self, MatchMode, Query};
use crate::search_path::SearchPath;

/// Outcome of resolving a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Candidates in discovery order
    pub candidates: Vec<Candidate>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Finds manual files for queries
pub struct Resolver<F: ManFs = SystemFs> {
    fs: F,
    probes: Vec<Box<dyn Probe>>,
}

impl Resolver<SystemFs> {
    /// Resolver over the real file system
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemFs)
    }
}

impl<F: ManFs> Resolver<F> {
    #[must_use]
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            probes: probe::default_probes(),
        }
    }

    /// Replace the probe list
    #[must_use]
    pub fn with_probes(mut self, probes: Vec<Box<dyn Probe>>) -> Self {
        self.probes = probes;
        self
    }

    /// Resolve a query, probing the file system when the index has nothing
    ///
    /// The file system is only consulted for name lookups. Literal paths
    /// among the terms are appended afterwards in name lookups.
    #[must_use]
    pub fn resolve(&self, query: &Query, paths: &SearchPath, index: IndexResult) -> Resolution {
        let mut resolution = if query.mode == MatchMode::Name && index.candidates.is_empty() {
            debug!(terms = ?query.names, "index has no match, probing manual trees");
            self.search_filesystem(query, paths)
        } else {
            Resolution {
                candidates: index.candidates,
                diagnostics: Vec::new(),
            }
        };

        if query.mode == MatchMode::Name {
            self.add_literal_paths(query, &mut resolution);
        }
        resolution
    }

    /// Probe the manual trees for every term of a query
    ///
    /// Each hit is also reported as a stale index entry, since an index
    /// should have known about it. Terms without a hit get exactly one
    /// diagnostic, except terms that are paths.
    #[must_use]
    pub fn search_filesystem(&self, query: &Query, paths: &SearchPath) -> Resolution {
        let mut resolution = Resolution::default();
        let sections = query.sections();

        for name in &query.names {
            let found_before = resolution.candidates.len();

            for (index, root) in paths.roots().iter().enumerate() {
                for section in &sections {
                    let target = ProbeTarget {
                        root,
                        section,
                        arch: query.arch.as_deref(),
                        name,
                    };
                    let Some(hit) = probe::first_hit(&self.probes, &target, &self.fs) else {
                        continue;
                    };

                    resolution.diagnostics.push(Diagnostic::StaleIndex {
                        name: name.clone(),
                        section: (*section).to_string(),
                        root: root.clone(),
                    });
                    resolution
                        .candidates
                        .push(candidate_from_hit(hit, &target, index));

                    if query.first_match {
                        return resolution;
                    }
                }
            }

            if resolution.candidates.len() == found_before && !name.contains('/') {
                resolution.diagnostics.push(miss_diagnostic(query, name));
            }
        }
        resolution
    }

    /// Whether any term of a query exists, stopping at the first hit
    ///
    /// After the probes fail in the last root, `<name>.<section>` is also
    /// tried relative to the current directory. No candidates are built.
    #[must_use]
    pub fn exists(&self, query: &Query, paths: &SearchPath) -> bool {
        let sections = query.sections();
        query.names.iter().any(|name| {
            paths.roots().iter().enumerate().any(|(index, root)| {
                sections.iter().any(|section| {
                    let target = ProbeTarget {
                        root,
                        section,
                        arch: query.arch.as_deref(),
                        name,
                    };
                    probe::first_hit(&self.probes, &target, &self.fs).is_some()
                        || (paths.is_last(index)
                            && self.fs.exists(Path::new(&format!("{name}.{section}"))))
                })
            })
        })
    }

    fn add_literal_paths(&self, query: &Query, resolution: &mut Resolution) {
        for name in query.names.iter().filter(|name| name.contains('/')) {
            let path = Path::new(name);
            match std::fs::File::open(path) {
                Ok(_) => resolution.candidates.push(Candidate::literal(path)),
                Err(e) => resolution.diagnostics.push(Diagnostic::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }),
            }
        }
    }
}

fn candidate_from_hit(hit: Hit, target: &ProbeTarget<'_>, index: usize) -> Candidate {
    Candidate {
        file: hit.file,
        names: Vec::new(),
        description: None,
        section: query::section_number(target.section),
        arch: target.arch.map(str::to_string),
        search_index: None,
        root: None,
        form: hit.form,
        matched: MatchKind::FileName,
    }
    .in_root(index, target.root)
}

fn miss_diagnostic(query: &Query, name: &str) -> Diagnostic {
    match (&query.arch, &query.section) {
        (Some(arch), _) if !query::is_known_arch(arch) => {
            Diagnostic::UnknownArchitecture(arch.clone())
        }
        (_, None) => Diagnostic::NoEntry {
            name: name.to_string(),
        },
        (_, Some(section)) => Diagnostic::NoEntryInSection {
            name: name.to_string(),
            section: section.clone(),
        },
    }
}
