//! crates/storage/src/home.rs
//!
//! `~`-expansion, grounded on the original's `expand_path` (S1.c): a
//! leading `~` is replaced with `$HOME`; every other path is left alone.

use std::env;
use std::path::PathBuf;

use crate::error::StorageError;

/// Expands a leading `~` to the value of `$HOME`. Paths without a leading
/// `~` are returned unchanged.
///
/// Unlike the original, a missing `$HOME` is a hard error rather than a
/// silent pass-through of the unexpanded `~`, since a literal `~` segment
/// would then be treated as a real directory name and silently diverge
/// from what the caller meant.
pub fn expand(path: &str) -> Result<PathBuf, StorageError> {
    if let Some(rest) = path.strip_prefix('~') {
        let home = env::var("HOME").map_err(|_| StorageError::HomeNotSet)?;
        let mut expanded = PathBuf::from(home);
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        if !rest.is_empty() {
            expanded.push(rest);
        }
        Ok(expanded)
    } else {
        Ok(PathBuf::from(path))
    }
}
