//! Renderer collaborators
//!
//! Macro parsing and formatting happen outside this crate. A `Renderer`
//! turns one source document into output bytes and reports the cross
//! references it saw. Preformatted pages never reach a renderer; they go
//! through `passthrough`.

pub mod command;
pub mod error;
pub mod passthrough;
pub mod xref;

pub use command::{CommandRenderer, VerbatimRenderer};
pub use error::RenderError;
pub use passthrough::{passthrough, plain_text};
pub use xref::Xref;

use std::io::Write;
use std::path::Path;

/// One input, read into memory, ready to render
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Where the content came from, for messages
    pub path: &'a Path,
    pub content: &'a [u8],
    /// Manual root owning the document; relative includes resolve against it
    pub root: Option<&'a Path>,
    /// Output width in columns
    pub width: usize,
    pub synopsis_only: bool,
}

/// What a renderer found while rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    pub xrefs: Vec<Xref>,
}

/// Formats a source document
pub trait Renderer {
    /// Render `document` into `out`
    ///
    /// # Errors
    /// Returns `RenderError::Output` if writing to `out` fails, which ends
    /// the run; any other error only concerns this document.
    fn render(&self, document: &Document<'_>, out: &mut dyn Write) -> error::Result<RenderOutcome>;
}
