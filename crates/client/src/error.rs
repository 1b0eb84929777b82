//! crates/client/src/error.rs

use std::io;

use thiserror::Error;

/// Errors raised by the interactive client while issuing one command.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A local file referenced by `uploadf` does not exist or is not a
    /// regular file.
    #[error("file '{0}' does not exist in the current directory")]
    LocalFileMissing(String),
    /// A filename's extension is not one of the four supported families.
    #[error("only .c, .pdf, .txt, and .zip files are supported")]
    UnsupportedExtension,
    /// A path argument did not begin with the virtual root `~/S1`.
    #[error("path must be within ~/S1")]
    OutsideVirtualRoot,
    /// The router or a shard sent a response the client did not expect.
    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),
    /// Network or local file I/O error.
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Wire protocol parsing error.
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
}
