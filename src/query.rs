//! Query model for manual lookups
//!
//! A `Query` carries the terms the user asked for together with the
//! constraints that narrow the lookup: section, architecture, match mode and
//! whether the first hit ends the search.

/// Sections in the order they are tried when no section is requested.
///
/// The order reflects how often pages in each section are asked for, and it
/// doubles as the base score of the section ranker.
pub const SECTION_PREFERENCE: [&str; 10] = ["1", "8", "6", "2", "3", "5", "7", "4", "9", "3p"];

/// Architectures with their own manual layer.
pub const KNOWN_ARCHITECTURES: [&str; 15] = [
    "alpha", "amd64", "arm64", "armv7", "hppa", "i386", "landisk", "loongson", "luna88k", "macppc",
    "mips64", "octeon", "powerpc64", "riscv64", "sparc64",
];

/// How query terms are matched against manuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Exact page name lookup (`man`)
    #[default]
    Name,
    /// Keyword lookup over names (`whatis`)
    Keyword,
    /// Search expression over names and descriptions (`apropos`)
    Expression,
    /// Terms are file paths to format directly (`mandoc`)
    File,
}

/// A manual lookup request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Page names (or files, in `MatchMode::File`) in command-line order
    pub names: Vec<String>,
    /// Section prefix, e.g. `3` or `3p`
    pub section: Option<String>,
    /// Architecture layer to consider, e.g. `amd64`
    pub arch: Option<String>,
    pub mode: MatchMode,
    /// Stop the whole search at the first page found
    pub first_match: bool,
}

impl Query {
    /// Create a name lookup for the given terms
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Restrict the lookup to a section
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Include an architecture-specific layer
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn first_match(mut self, first: bool) -> Self {
        self.first_match = first;
        self
    }

    /// Sections to probe, in order: the requested one, or the preference list
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        match &self.section {
            Some(section) => vec![section.as_str()],
            None => SECTION_PREFERENCE.to_vec(),
        }
    }
}

/// Position of a section digit in `SECTION_PREFERENCE`
///
/// Returns `None` for characters that do not start any preferred section.
#[must_use]
pub fn section_rank(digit: char) -> Option<usize> {
    SECTION_PREFERENCE
        .iter()
        .position(|sec| sec.starts_with(digit))
}

/// Numeric classification of a section string: 1-9, or 10 when unclassified
#[must_use]
pub fn section_number(section: &str) -> u8 {
    match section.as_bytes().first() {
        Some(b @ b'1'..=b'9') => b - b'0',
        _ => 10,
    }
}

/// Whether an argument looks like a section rather than a page name
///
/// Accepts a digit alone or followed by letters (`3`, `3p`, `8amd64`) and `n`.
#[must_use]
pub fn looks_like_section(arg: &str) -> bool {
    let mut chars = arg.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => match chars.next() {
            None => true,
            Some(next) => next.is_ascii_alphabetic(),
        },
        Some('n') => chars.next().is_none(),
        _ => false,
    }
}

/// Whether the architecture has its own manual layer
#[must_use]
pub fn is_known_arch(arch: &str) -> bool {
    KNOWN_ARCHITECTURES.contains(&arch)
}

/// Architecture name of the running machine, in manual-tree naming
#[must_use]
pub fn default_arch() -> String {
    if let Ok(machine) = std::env::var("MACHINE")
        && !machine.is_empty()
    {
        return machine;
    }
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "i386",
        "aarch64" => "arm64",
        "arm" => "armv7",
        "powerpc64" => "powerpc64",
        "riscv64" => "riscv64",
        "sparc64" => "sparc64",
        other => other,
    }
    .to_string()
}
