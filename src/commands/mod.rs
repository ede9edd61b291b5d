//! Command implementations
//!
//! Each mode is a module with an `execute` function that takes the parsed
//! invocation and the collaborators of the run, renders into a `Delivery`
//! and returns a `Report`. `finish` then shows paged output.

pub mod file;
pub mod lookup;
pub mod show;

pub use file::execute as file;
pub use lookup::execute as lookup;

use std::io::Write;

use tracing::debug;

use crate::delivery::{Delivery, PagerCommand, SystemJobControl};
use crate::index::ManIndex;
use crate::render::Renderer;
use crate::resolve::{Diagnostic, ManFs, Resolver, SystemFs, XrefContext};
use crate::search_path::SearchPath;
use crate::{ExitLevel, ManrError};

/// Collaborators and settings shared by every command of a run
pub struct Context<'a, F: ManFs = SystemFs> {
    pub paths: &'a SearchPath,
    pub index: &'a dyn ManIndex,
    pub resolver: &'a Resolver<F>,
    pub renderer: &'a dyn Renderer,
    /// Set when cross references should be checked
    pub xrefs: Option<&'a XrefContext>,
    /// Output width in columns
    pub width: usize,
    /// Colorize list and path output
    pub color: bool,
}

/// What a command produced besides its output
#[derive(Debug, Default)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    pub level: ExitLevel,
    /// Error that ended the run early
    pub fatal: Option<ManrError>,
}

impl Report {
    pub fn note(&mut self, diagnostic: Diagnostic) {
        if let Some(level) = diagnostic.level() {
            self.level.raise(level);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.note(diagnostic);
        }
    }

    pub fn fail(&mut self, error: impl Into<ManrError>) {
        let error = error.into();
        self.level.raise(error.level());
        self.fatal = Some(error);
    }
}

/// Show paged output, if the run collected any
///
/// # Errors
/// Returns `ManrError::Delivery` if flushing, job control or cleanup fails.
pub fn finish<W: Write>(delivery: Delivery<W>, configured_pager: Option<&str>) -> Result<(), ManrError> {
    let Some(session) = delivery.into_session()? else {
        return Ok(());
    };
    let pager = PagerCommand::from_env(configured_pager);
    debug!(program = %pager.program, "paging output");

    let mut control = SystemJobControl::from_stdout()?;
    session.deliver(&mut control, &pager)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_levels() {
        let mut report = Report::default();
        report.note(Diagnostic::NoEntry { name: "ls".into() });
        assert_eq!(report.level, ExitLevel::Ok);

        report.note(Diagnostic::Unreadable {
            path: PathBuf::from("/x"),
            reason: "gone".into(),
        });
        assert_eq!(report.level, ExitLevel::Error);

        report.fail(std::io::Error::other("disk"));
        assert_eq!(report.level, ExitLevel::SysErr);
        assert!(report.fatal.is_some());
        assert_eq!(report.diagnostics.len(), 2);
    }

    #[test]
    fn test_finish_without_session() {
        let delivery = Delivery::new(Vec::new(), false, None);
        finish(delivery, None).unwrap();
    }
}
