//! crates/storage/src/root.rs
//!
//! Shard-side path root enforcement (spec §9, Open Question 6: the original
//! router checked `is_path_in_s1` before dispatching, but a shard never
//! re-validated the path it was handed over a sub-connection — a
//! compromised or buggy router could make any shard touch any path on the
//! host. Every shard here re-validates independently.)

use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::home;

/// A filesystem root this process owns, with every externally supplied
/// path checked against it before use.
#[derive(Debug, Clone)]
pub struct ManagedRoot {
    resolved: PathBuf,
}

impl ManagedRoot {
    /// Resolves `home_path` (e.g. `~/S2`) to an absolute root, creating it
    /// (and any missing ancestors) if it does not yet exist.
    pub fn open(home_path: &str) -> Result<ManagedRoot, StorageError> {
        let resolved = home::expand(home_path)?;
        std::fs::create_dir_all(&resolved)
            .map_err(|e| StorageError::io(resolved.clone(), e))?;
        let resolved = resolved
            .canonicalize()
            .map_err(|e| StorageError::io(resolved.clone(), e))?;
        Ok(ManagedRoot { resolved })
    }

    /// The canonical, absolute root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.resolved
    }

    /// Expands and validates an externally supplied path, returning the
    /// resolved absolute path if — and only if — it lies under this root.
    ///
    /// Validation happens against the *lexically normalized* candidate
    /// rather than `canonicalize`, since the final path component may not
    /// exist yet (an upload target, for instance). Ancestor components
    /// that do exist are still checked via their canonical form so a
    /// symlink cannot walk the result outside the root.
    pub fn validate(&self, wire_path: &str) -> Result<PathBuf, StorageError> {
        let expanded = home::expand(wire_path)?;
        let normalized = normalize(&expanded);
        if !normalized.starts_with(&self.resolved) {
            return Err(StorageError::OutsideRoot(normalized));
        }
        if let Some(parent) = normalized.parent() {
            if parent.exists() {
                let real = parent
                    .canonicalize()
                    .map_err(|e| StorageError::io(parent, e))?;
                if !real.starts_with(&self.resolved) {
                    return Err(StorageError::OutsideRoot(normalized));
                }
            }
        }
        Ok(normalized)
    }
}

/// Lexically collapses `.` and `..` components without touching the
/// filesystem, so a not-yet-created path can still be range-checked.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
