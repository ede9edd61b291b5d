//! Pager command resolution
//!
//! The command comes from `MANPAGER`, then `PAGER`, then the configured
//! pager, then `DEFAULT_PAGER`. It is split into words on whitespace and
//! nothing else: no quoting, no expansion.

use std::ffi::OsString;
use std::path::Path;

/// Used when nothing else names a pager
pub const DEFAULT_PAGER: &str = "more -s";

/// Pagers that understand `-T tagfile` and `-t tag`
const TAG_AWARE: [&str; 2] = ["less", "more"];

/// A pager program with its leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PagerCommand {
    /// Split a command line on whitespace
    ///
    /// Returns `None` for a blank command.
    #[must_use]
    pub fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Resolve the pager from the environment and configuration
    ///
    /// `lookup` reads an environment variable; empty values count as unset.
    #[must_use]
    pub fn resolve<F>(lookup: F, configured: Option<&str>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ["MANPAGER", "PAGER"]
            .iter()
            .filter_map(|key| lookup(key))
            .chain(configured.map(str::to_string))
            .find_map(|command| Self::parse(&command))
            .or_else(|| Self::parse(DEFAULT_PAGER))
            .unwrap_or_else(|| Self {
                program: "more".to_string(),
                args: Vec::new(),
            })
    }

    /// Resolve the pager from the process environment
    #[must_use]
    pub fn from_env(configured: Option<&str>) -> Self {
        Self::resolve(|key| std::env::var(key).ok(), configured)
    }

    /// Whether the program accepts tag-file arguments
    #[must_use]
    pub fn is_tag_aware(&self) -> bool {
        Path::new(&self.program)
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| TAG_AWARE.contains(&name))
    }

    /// Full argument vector, program first
    ///
    /// Tag-aware pagers get `-T <tags>`, and with a tag `-t <tag>` in place
    /// of the output path, so they open the output at the tagged line.
    #[must_use]
    pub fn argv(&self, output: &Path, tags: &Path, tag: Option<&str>) -> Vec<OsString> {
        let mut argv: Vec<OsString> = std::iter::once(&self.program)
            .chain(&self.args)
            .map(OsString::from)
            .collect();

        let mut use_output = true;
        if self.is_tag_aware() {
            argv.push("-T".into());
            argv.push(tags.into());
            if let Some(tag) = tag {
                argv.push("-t".into());
                argv.push(tag.into());
                use_output = false;
            }
        }
        if use_output {
            argv.push(output.into());
        }
        argv
    }
}
