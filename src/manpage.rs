//! Resolved manual documents

use std::path::{Path, PathBuf};

/// On-disk form of a manual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    /// Macro source that must go through a renderer
    #[default]
    Source,
    /// Cached, already formatted copy served verbatim
    Preformatted,
}

/// How a candidate was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKind {
    /// Reported by the index
    #[default]
    Index,
    /// Found by probing the file system
    FileName,
    /// Given literally as a path
    Literal,
}

/// One resolved manual document reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub file: PathBuf,
    /// Page names documented by this file
    pub names: Vec<String>,
    /// One-line description, when the index provides one
    pub description: Option<String>,
    /// Section number 1-9, or 10 when unclassified
    pub section: u8,
    pub arch: Option<String>,
    /// Position of the owning root in the search path
    pub search_index: Option<usize>,
    /// The owning root itself
    pub root: Option<PathBuf>,
    pub form: Form,
    pub matched: MatchKind,
}

impl Candidate {
    /// Create a candidate for a file outside any search root
    #[must_use]
    pub fn literal(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            names: Vec::new(),
            description: None,
            section: 10,
            arch: None,
            search_index: None,
            root: None,
            form: Form::Source,
            matched: MatchKind::Literal,
        }
    }

    /// Attach the owning search root
    #[must_use]
    pub fn in_root(mut self, index: usize, root: impl Into<PathBuf>) -> Self {
        self.search_index = Some(index);
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub const fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    #[must_use]
    pub const fn with_section(mut self, section: u8) -> Self {
        self.section = section;
        self
    }

    #[must_use]
    pub const fn with_match(mut self, matched: MatchKind) -> Self {
        self.matched = matched;
        self
    }

    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Path of the file below its owning root
    ///
    /// Falls back to the full path for candidates without a root.
    #[must_use]
    pub fn shelf_path(&self) -> &Path {
        self.root
            .as_deref()
            .and_then(|root| self.file.strip_prefix(root).ok())
            .unwrap_or(&self.file)
    }

    /// Names joined for list output, or the file stem when there are none
    #[must_use]
    pub fn display_names(&self) -> String {
        if self.names.is_empty() {
            self.file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            self.names.join(", ")
        }
    }
}
