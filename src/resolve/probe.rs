//! File system probe strategies
//!
//! Each probe checks one conventional location for a page within a single
//! (root, section) pair. The resolver runs them in `default_probes` order
//! and stops at the first hit.

use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use super::fs::ManFs;
use crate::manpage::Form;

/// Where a probe looks
#[derive(Debug, Clone, Copy)]
pub struct ProbeTarget<'a> {
    pub root: &'a Path,
    pub section: &'a str,
    pub arch: Option<&'a str>,
    pub name: &'a str,
}

impl ProbeTarget<'_> {
    fn man_dir(&self) -> PathBuf {
        self.root.join(format!("man{}", self.section))
    }

    fn cat_dir(&self) -> PathBuf {
        self.root.join(format!("cat{}", self.section))
    }
}

/// Append `leaf` below `dir` as text, so a name with slashes stays inside
fn file_in(dir: PathBuf, leaf: &str) -> PathBuf {
    let mut path = dir.into_os_string();
    path.push("/");
    path.push(leaf);
    PathBuf::from(path)
}

/// A page found by a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub file: PathBuf,
    pub form: Form,
}

/// One location strategy
pub trait Probe {
    /// Short label used in logs
    fn label(&self) -> &'static str;

    /// Look for the page, returning the file if it exists
    fn probe(&self, target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit>;
}

/// `root/man<sec>/<name>.<sec>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePage;

impl Probe for SourcePage {
    fn label(&self) -> &'static str {
        "source"
    }

    fn probe(&self, target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit> {
        let file = file_in(target.man_dir(), &format!("{}.{}", target.name, target.section));
        fs.exists(&file).then_some(Hit {
            file,
            form: Form::Source,
        })
    }
}

/// `root/cat<sec>/<name>.0`
#[derive(Debug, Clone, Copy, Default)]
pub struct CatPage;

impl Probe for CatPage {
    fn label(&self) -> &'static str {
        "preformatted"
    }

    fn probe(&self, target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit> {
        let file = file_in(target.cat_dir(), &format!("{}.0", target.name));
        fs.exists(&file).then_some(Hit {
            file,
            form: Form::Preformatted,
        })
    }
}

/// `root/man<sec>/<arch>/<name>.<sec>`, only with an architecture
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchPage;

impl Probe for ArchPage {
    fn label(&self) -> &'static str {
        "architecture"
    }

    fn probe(&self, target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit> {
        let arch = target.arch?;
        let file = file_in(
            target.man_dir().join(arch),
            &format!("{}.{}", target.name, target.section),
        );
        fs.exists(&file).then_some(Hit {
            file,
            form: Form::Source,
        })
    }
}

/// First match of `root/man<sec>/<name>.[01-9]*`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedSuffix;

impl NumberedSuffix {
    #[must_use]
    pub fn pattern(target: &ProbeTarget<'_>) -> String {
        format!(
            "{}/{}.[01-9]*",
            glob::Pattern::escape(&target.man_dir().to_string_lossy()),
            glob::Pattern::escape(target.name)
        )
    }
}

impl Probe for NumberedSuffix {
    fn label(&self) -> &'static str {
        "glob"
    }

    fn probe(&self, target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit> {
        let pattern = Self::pattern(target);
        match fs.glob_first(&pattern) {
            Ok(Some(file)) if fs.exists(&file) => Some(Hit {
                file,
                form: Form::Source,
            }),
            Ok(_) => None,
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }
}

/// The probes in the order they are tried
#[must_use]
pub fn default_probes() -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(SourcePage),
        Box::new(CatPage),
        Box::new(ArchPage),
        Box::new(NumberedSuffix),
    ]
}

/// Run probes in order until one hits
pub fn first_hit(probes: &[Box<dyn Probe>], target: &ProbeTarget<'_>, fs: &dyn ManFs) -> Option<Hit> {
    probes.iter().find_map(|probe| {
        let hit = probe.probe(target, fs);
        trace!(
            probe = probe.label(),
            root = %target.root.display(),
            section = target.section,
            name = target.name,
            found = hit.is_some(),
            "probe"
        );
        hit
    })
}
