//! Paged output session
//!
//! Rendered output is collected in a temporary file, then handed to one
//! pager process. Both temporary files are removed when the session ends,
//! whichever way it ends.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

use super::error::{DeliveryError, Result};
use super::job::{self, JobControl, Negotiation};
use super::pager::PagerCommand;
use super::tags;

const TEMP_PREFIX: &str = "man.";

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Temporary files exist and output is being written
    FilesOpen,
    /// Output is complete and the tag file written
    ContentWritten,
    /// The pager has been started
    PagerSpawned,
}

/// Temporary output and tag file for one run
#[derive(Debug)]
pub struct PagerSession {
    output: BufWriter<NamedTempFile>,
    tags: NamedTempFile,
    tag: Option<String>,
    state: SessionState,
}

impl PagerSession {
    /// Create the temporary file pair in the system temporary directory
    ///
    /// # Errors
    /// Returns `DeliveryError::TempFile` if either file cannot be created.
    pub fn create(tag: Option<String>) -> Result<Self> {
        Self::create_in(std::env::temp_dir(), tag)
    }

    /// Create the temporary file pair in `dir`
    ///
    /// # Errors
    /// Returns `DeliveryError::TempFile` if either file cannot be created.
    pub fn create_in(dir: impl AsRef<Path>, tag: Option<String>) -> Result<Self> {
        let dir = dir.as_ref();
        let output = Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)
            .map_err(DeliveryError::TempFile)?;
        let tags = Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)
            .map_err(DeliveryError::TempFile)?;
        debug!(output = %output.path().display(), tags = %tags.path().display(), "pager files open");

        Ok(Self {
            output: BufWriter::new(output),
            tags,
            tag,
            state: SessionState::FilesOpen,
        })
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        self.output.get_ref().path()
    }

    #[must_use]
    pub fn tags_path(&self) -> &Path {
        self.tags.path()
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Writer for rendered output
    pub fn writer(&mut self) -> &mut dyn Write {
        &mut self.output
    }

    /// Flush the output and write the tag file
    ///
    /// # Errors
    /// Returns `DeliveryError::Write` if either file cannot be written.
    pub fn finish_output(&mut self) -> Result<()> {
        let output_path = self.output_path().to_path_buf();
        self.output.flush().map_err(|source| DeliveryError::Write {
            path: output_path.clone(),
            source,
        })?;

        if let Some(tag) = &self.tag {
            let reader = BufReader::new(File::open(&output_path)?);
            match tags::find_tag_line(reader, tag)? {
                Some(line) => {
                    tags::write_entry(self.tags.as_file_mut(), tag, &output_path, line).map_err(
                        |source| DeliveryError::Write {
                            path: self.tags.path().to_path_buf(),
                            source,
                        },
                    )?;
                }
                None => debug!(tag, "tag not found in output"),
            }
        }
        self.state = SessionState::ContentWritten;
        Ok(())
    }

    /// Show the output in the pager and remove the files afterwards
    ///
    /// The files are removed whether or not paging succeeded.
    ///
    /// # Errors
    /// Returns `DeliveryError` if finishing the output or any process
    /// control fails; the paging error wins over a cleanup error.
    pub fn deliver<J: JobControl + ?Sized>(
        mut self,
        control: &mut J,
        pager: &PagerCommand,
    ) -> Result<Negotiation> {
        let result = self.run_pager(control, pager);
        let cleanup = self.cleanup();
        let negotiation = result?;
        cleanup?;
        Ok(negotiation)
    }

    fn run_pager<J: JobControl + ?Sized>(
        &mut self,
        control: &mut J,
        pager: &PagerCommand,
    ) -> Result<Negotiation> {
        self.finish_output()?;
        let argv = pager.argv(self.output_path(), self.tags_path(), self.tag.as_deref());
        self.state = SessionState::PagerSpawned;
        let negotiation = job::negotiate(control, &argv)?;
        if let Err(e) = job::restore_terminal(control, negotiation.terminal_owner, negotiation.pager) {
            warn!("{e}");
        }
        Ok(negotiation)
    }

    /// Remove both temporary files, ending the session
    ///
    /// # Errors
    /// Returns `DeliveryError::IoError` if a file cannot be removed.
    pub fn cleanup(self) -> Result<Vec<PathBuf>> {
        let paths = vec![self.output_path().to_path_buf(), self.tags_path().to_path_buf()];
        let (output, _unwritten) = self.output.into_parts();
        let first = output.close();
        let second = self.tags.close();
        first?;
        second?;
        debug!(?paths, "pager files removed");
        Ok(paths)
    }
}
