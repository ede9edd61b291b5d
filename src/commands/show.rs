//! Rendering inputs one after another into the delivery

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use super::{Context, Report};
use crate::delivery::{Delivery, DeliveryError};
use crate::manpage::Form;
use crate::output;
use crate::render::{Document, RenderError, RenderOutcome, passthrough};
use crate::resolve::{Diagnostic, ManFs};

/// One input to show
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    pub path: &'a Path,
    /// Owning manual root, if any
    pub root: Option<&'a Path>,
    pub form: Form,
}

/// Renders inputs in order, separating consecutive pages
pub struct Shower<'r, 'c, W: Write, F: ManFs> {
    context: &'r Context<'c, F>,
    delivery: &'r mut Delivery<W>,
    report: &'r mut Report,
    synopsis_only: bool,
    shown: usize,
}

impl<'r, 'c, W: Write, F: ManFs> Shower<'r, 'c, W, F> {
    pub fn new(
        context: &'r Context<'c, F>,
        delivery: &'r mut Delivery<W>,
        report: &'r mut Report,
        synopsis_only: bool,
    ) -> Self {
        Self {
            context,
            delivery,
            report,
            synopsis_only,
            shown: 0,
        }
    }

    /// Number of inputs shown so far
    #[must_use]
    pub const fn shown(&self) -> usize {
        self.shown
    }

    /// Read and show a file
    ///
    /// Returns `false` once the run must stop.
    pub fn show_file(&mut self, input: Input<'_>) -> bool {
        let content = std::fs::read(input.path);
        self.show(input, content)
    }

    /// Show content that has already been read
    ///
    /// An input that cannot be read or rendered is reported and skipped.
    /// Returns `false` after a write error on the output, which ends the run.
    pub fn show(&mut self, input: Input<'_>, content: io::Result<Vec<u8>>) -> bool {
        let content = match content {
            Ok(content) => content,
            Err(e) => {
                self.report.note(Diagnostic::Unreadable {
                    path: input.path.to_path_buf(),
                    reason: e.to_string(),
                });
                return true;
            }
        };

        self.delivery.begin_input();
        let destination = self.delivery.destination();
        let width = self.context.width;

        if self.shown > 0
            && let Err(source) = self.delivery.writer().write_all(output::separator(width).as_bytes())
        {
            self.report.fail(DeliveryError::Write {
                path: destination,
                source,
            });
            return false;
        }

        debug!(path = %input.path.display(), form = ?input.form, "rendering");
        let writer = self.delivery.writer();
        let rendered = match input.form {
            Form::Preformatted => passthrough(content.as_slice(), writer, self.synopsis_only)
                .map(|()| RenderOutcome::default()),
            Form::Source => {
                let document = Document {
                    path: input.path,
                    content: &content,
                    root: input.root,
                    width,
                    synopsis_only: self.synopsis_only,
                };
                self.context.renderer.render(&document, writer)
            }
        };

        let outcome = match rendered {
            Ok(outcome) => outcome,
            Err(RenderError::Output(source)) => {
                self.report.fail(DeliveryError::Write {
                    path: destination,
                    source,
                });
                return false;
            }
            Err(e) => {
                self.report.note(Diagnostic::Unreadable {
                    path: input.path.to_path_buf(),
                    reason: e.to_string(),
                });
                return true;
            }
        };
        self.shown += 1;

        if let Err(e) = self.delivery.flush() {
            self.report.fail(e);
            return false;
        }

        if let Some(xrefs) = self.context.xrefs {
            let found = xrefs.check(input.path, &outcome.xrefs, self.context.index, self.context.resolver);
            self.report.extend(found);
        }
        true
    }
}
