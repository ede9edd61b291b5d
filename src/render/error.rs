//! Render error types

use thiserror::Error;

/// Errors that can occur while rendering one input
#[derive(Debug, Error)]
pub enum RenderError {
    /// Reading the input failed
    #[error("read: {0}")]
    Input(#[source] std::io::Error),

    /// Writing rendered output failed
    #[error("write: {0}")]
    Output(#[source] std::io::Error),

    /// The formatter program could not be started
    #[error("exec {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The formatter program reported failure
    #[error("{program} exited with status {status}")]
    Formatter { program: String, status: i32 },
}

impl RenderError {
    /// Whether this error concerns the shared output, ending the run
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
