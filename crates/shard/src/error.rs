//! crates/shard/src/error.rs

use std::io;

use thiserror::Error;

/// Errors surfaced by the shard's top-level run loop and configuration.
#[derive(Debug, Error)]
pub enum ShardError {
    /// Failed to bind or accept on the listening socket.
    #[error("network error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Filesystem error from the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
}
