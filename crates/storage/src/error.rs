//! crates/storage/src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by filesystem home resolution, path validation, and
/// transfer writes.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A path escaped the caller's own root (spec §9, Open Question 6: the
    /// shard must enforce this itself, not trust the router).
    #[error("path {0} is outside the managed root")]
    OutsideRoot(PathBuf),
    /// `$HOME` was unset and a `~`-prefixed path needed expansion.
    #[error("cannot expand `~`: HOME is not set")]
    HomeNotSet,
    /// I/O error while creating directories, writing, reading, or renaming.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path the failing operation was acting on.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> StorageError {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_root_message_includes_path() {
        let err = StorageError::OutsideRoot(PathBuf::from("/tmp/evil"));
        assert!(err.to_string().contains("/tmp/evil"));
    }
}
