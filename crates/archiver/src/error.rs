//! crates/archiver/src/error.rs

use std::io;

use thiserror::Error;

/// Errors raised while building a tar archive of a file set.
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// No input files matched; the caller should report `NO_FILES` rather
    /// than build an empty archive.
    #[error("no files to archive")]
    NoFiles,
    /// I/O error while walking the source directory, spooling, or writing
    /// the archive.
    #[error("I/O error while archiving: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// The external `tar` subprocess exited with a non-zero status.
    #[error("external tar command failed: {0}")]
    ExternalCommandFailed(String),
}
