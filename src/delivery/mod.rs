//! Output delivery
//!
//! Rendered pages go either straight to standard output or, when paging,
//! into a `PagerSession` that is shown by one pager once everything is
//! rendered. The session is only created when the first input is about to
//! be rendered; if that fails, the whole run falls back to direct output.

pub mod error;
pub mod job;
pub mod pager;
pub mod session;
pub mod system;
pub mod tags;

pub use error::DeliveryError;
pub use job::{ChildStatus, JobControl, JobState, Negotiation};
pub use pager::PagerCommand;
pub use session::{PagerSession, SessionState};
pub use system::SystemJobControl;

use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

use error::Result;

/// Where rendered output goes for one run
#[derive(Debug)]
pub struct Delivery<W: Write = io::Stdout> {
    direct: W,
    paging: bool,
    attempted: bool,
    tag: Option<String>,
    temp_dir: Option<PathBuf>,
    session: Option<PagerSession>,
}

impl Delivery<io::Stdout> {
    /// Deliver to standard output, paging if `paging` is set
    #[must_use]
    pub fn stdout(paging: bool, tag: Option<String>) -> Self {
        Self::new(io::stdout(), paging, tag)
    }
}

impl<W: Write> Delivery<W> {
    #[must_use]
    pub const fn new(direct: W, paging: bool, tag: Option<String>) -> Self {
        Self {
            direct,
            paging,
            attempted: false,
            tag,
            temp_dir: None,
            session: None,
        }
    }

    /// Put the temporary files in `dir` instead of the system default
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Called before each input is rendered
    ///
    /// Creates the pager session on the first call when paging. A failure
    /// is logged and paging is switched off for the rest of the run.
    pub fn begin_input(&mut self) {
        if !self.paging || self.attempted {
            return;
        }
        self.attempted = true;

        let created = match &self.temp_dir {
            Some(dir) => PagerSession::create_in(dir, self.tag.clone()),
            None => PagerSession::create(self.tag.clone()),
        };
        match created {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                warn!("{e}, writing to standard output");
                self.paging = false;
            }
        }
    }

    /// Whether output currently goes to a pager session
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&PagerSession> {
        self.session.as_ref()
    }

    /// Writer for the current input
    pub fn writer(&mut self) -> &mut dyn Write {
        match &mut self.session {
            Some(session) => session.writer(),
            None => &mut self.direct,
        }
    }

    /// Flush whatever has been written so far
    ///
    /// # Errors
    /// Returns `DeliveryError::Write` naming the failing destination.
    pub fn flush(&mut self) -> Result<()> {
        let path = self.destination();
        self.writer()
            .flush()
            .map_err(|source| DeliveryError::Write { path, source })
    }

    /// Name of the current destination for messages
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.session
            .as_ref()
            .map_or_else(|| PathBuf::from("stdout"), |s| s.output_path().to_path_buf())
    }

    /// Stop delivering: remove any session files without paging
    ///
    /// # Errors
    /// Returns `DeliveryError::IoError` if the files cannot be removed.
    pub fn abandon(self) -> Result<()> {
        if let Some(session) = self.session {
            session.cleanup()?;
        }
        Ok(())
    }

    /// Finish direct output and hand back the session to page, if any
    ///
    /// # Errors
    /// Returns `DeliveryError::Write` if flushing direct output fails.
    pub fn into_session(mut self) -> Result<Option<PagerSession>> {
        if self.session.is_none() {
            self.flush()?;
        }
        Ok(self.session)
    }

    /// Consume the delivery, returning the direct writer
    #[must_use]
    pub fn into_direct(self) -> W {
        self.direct
    }
}
