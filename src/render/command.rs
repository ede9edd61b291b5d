//! Built-in renderers

use std::io::{Read, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::{RenderError, Result};
use super::{Document, RenderOutcome, Renderer, passthrough, xref};

/// Copies the source unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimRenderer;

impl Renderer for VerbatimRenderer {
    fn render(&self, document: &Document<'_>, out: &mut dyn Write) -> Result<RenderOutcome> {
        out.write_all(document.content).map_err(RenderError::Output)?;
        out.flush().map_err(RenderError::Output)?;
        Ok(RenderOutcome {
            xrefs: xref::scan(&String::from_utf8_lossy(document.content)),
        })
    }
}

/// Runs an external formatter on each document
///
/// The document is fed on standard input. The formatter runs in the owning
/// root, so relative `.so` includes resolve, with `COLUMNS` set to the
/// output width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Split a formatter command line on whitespace
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

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn format(&self, document: &Document<'_>) -> Result<Vec<u8>> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("COLUMNS", document.width.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped());
        if let Some(root) = document.root {
            command.current_dir(root);
        }
        debug!(program = %self.program, path = %document.path.display(), "running formatter");

        let spawn_error = |source| RenderError::Spawn {
            program: self.program.clone(),
            source,
        };
        let mut child = command.spawn().map_err(spawn_error)?;
        let (Some(mut stdin), Some(mut stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(spawn_error(std::io::Error::other("formatter pipes unavailable")));
        };

        let mut formatted = Vec::new();
        let read = std::thread::scope(|scope| {
            scope.spawn(move || {
                if let Err(e) = stdin.write_all(document.content) {
                    debug!("formatter input closed early: {e}");
                }
            });
            stdout.read_to_end(&mut formatted)
        });
        read.map_err(RenderError::Input)?;

        let status = child.wait().map_err(RenderError::Input)?;
        if !status.success() {
            return Err(RenderError::Formatter {
                program: self.program.clone(),
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(formatted)
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, document: &Document<'_>, out: &mut dyn Write) -> Result<RenderOutcome> {
        let formatted = self.format(document)?;
        passthrough(formatted.as_slice(), out, document.synopsis_only)?;
        Ok(RenderOutcome {
            xrefs: xref::scan(&String::from_utf8_lossy(document.content)),
        })
    }
}
