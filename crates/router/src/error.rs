//! crates/router/src/error.rs

use std::io;

use thiserror::Error;

/// Errors surfaced by the router's top-level run loop and configuration.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Failed to bind or accept on the listening socket.
    #[error("network error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// A configured shard address did not resolve/connect when needed.
    #[error("cannot reach shard for .{extension}: {source}")]
    ShardUnreachable {
        /// The extension tag of the shard that could not be reached.
        extension: &'static str,
        /// The underlying connection error.
        #[source]
        source: io::Error,
    },
    /// Filesystem error from the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
    /// Wire-level protocol error.
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
}
