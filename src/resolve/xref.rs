//! Cross-reference checking
//!
//! Rendered pages refer to other pages (`.Xr name section`). Each reference
//! is looked up against the base manual roots, the same way a single-page
//! lookup would find it. The base search path is built on first use and kept
//! by the `XrefContext` for the rest of the run.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use super::{Diagnostic, ManFs, Resolver};
use crate::index::ManIndex;
use crate::query::Query;
use crate::render::Xref;
use crate::search_path::{BASE_ROOTS, SearchPath};

/// Lazily built search path for cross-reference lookups
#[derive(Debug)]
pub struct XrefContext {
    roots: Vec<PathBuf>,
    paths: OnceCell<SearchPath>,
}

impl Default for XrefContext {
    fn default() -> Self {
        Self::new(BASE_ROOTS.iter().map(PathBuf::from).collect())
    }
}

impl XrefContext {
    /// Context searching the given roots
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            paths: OnceCell::new(),
        }
    }

    /// The search path, built on first call
    pub fn search_path(&self) -> &SearchPath {
        self.paths.get_or_init(|| {
            SearchPath::new(self.roots.iter().filter(|root| root.is_dir()).cloned())
        })
    }

    /// Whether the search path has been built yet
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.paths.get().is_some()
    }

    /// Report every cross reference of `file` that resolves nowhere
    pub fn check<F: ManFs>(
        &self,
        file: &Path,
        xrefs: &[Xref],
        index: &dyn ManIndex,
        resolver: &Resolver<F>,
    ) -> Vec<Diagnostic> {
        if xrefs.is_empty() {
            return Vec::new();
        }
        let paths = self.search_path();

        xrefs
            .iter()
            .filter(|xref| {
                let query = Query::new([xref.name.as_str()])
                    .with_section(xref.section.as_str())
                    .first_match(true);
                index.search(&query, paths).candidates.is_empty()
                    && !resolver.exists(&query, paths)
            })
            .map(|xref| Diagnostic::BadCrossReference {
                file: file.to_path_buf(),
                line: xref.line,
                name: xref.name.clone(),
                section: xref.section.clone(),
                count: xref.count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NoIndex;
    use crate::testing::MemoryFs;

    fn xref(name: &str, section: &str, line: usize, count: usize) -> Xref {
        Xref {
            name: name.into(),
            section: section.into(),
            line,
            count,
        }
    }

    #[test]
    fn test_search_path_built_lazily() {
        let context = XrefContext::new(vec![std::env::temp_dir()]);
        assert!(!context.is_initialized());

        let fs = MemoryFs::default();
        let resolver = Resolver::new(&fs);
        let none = context.check(Path::new("a.1"), &[], &NoIndex, &resolver);
        assert!(none.is_empty());
        assert!(!context.is_initialized());

        assert_eq!(context.search_path().len(), 1);
        assert!(context.is_initialized());
    }

    #[test]
    fn test_reports_missing_references() {
        let root = std::env::temp_dir();
        let existing = root.join("man1").join("ls.1");
        let fs = MemoryFs::new([existing]);
        let resolver = Resolver::new(&fs);
        let context = XrefContext::new(vec![root]);

        let refs = vec![xref("ls", "1", 3, 1), xref("nosuch", "7", 9, 2)];
        let diagnostics = context.check(Path::new("page.1"), &refs, &NoIndex, &resolver);

        assert_eq!(
            diagnostics,
            vec![Diagnostic::BadCrossReference {
                file: PathBuf::from("page.1"),
                line: 9,
                name: "nosuch".into(),
                section: "7".into(),
                count: 2,
            }]
        );
    }
}
