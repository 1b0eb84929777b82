//! crates/protocol/src/error.rs
//!
//! Error type shared by command parsing and wire framing.

use std::io;

use thiserror::Error;

/// Errors raised while parsing or framing protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A command line did not match any known grammar.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    /// An extension tag was not one of the four supported families.
    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),
    /// The peer closed the connection before a complete message arrived.
    #[error("connection closed before message was complete")]
    UnexpectedEof,
    /// A size pre-announcement line was not a valid decimal byte count.
    #[error("invalid size announcement: {0}")]
    InvalidSize(String),
    /// The peer sent something other than the expected handshake token.
    #[error("unexpected response from peer: {0}")]
    UnexpectedResponse(String),
    /// I/O error while reading or writing the wire.
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
}
