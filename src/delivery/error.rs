//! Delivery error types
//!
//! Every error here ends the run: the terminal is shared by everything that
//! is still to be shown, so there is no safe way to carry on after it.
//! Failing to allocate the temporary files is the exception; the caller
//! falls back to direct output instead of raising it.

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Pager session errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The temporary output or tag file could not be created
    #[error("temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    /// Writing rendered output failed
    #[error("{}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A process-control system call failed
    #[error("{call}: {source}")]
    ProcessControl {
        call: &'static str,
        #[source]
        source: Errno,
    },

    /// The pager could not be started
    #[error("exec {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DeliveryError {
    /// Wrap a failed system call
    #[must_use]
    pub const fn control(call: &'static str, source: Errno) -> Self {
        Self::ProcessControl { call, source }
    }
}

/// Result type for delivery operations
pub type Result<T> = std::result::Result<T, DeliveryError>;
