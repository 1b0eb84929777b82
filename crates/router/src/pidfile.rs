//! crates/router/src/pidfile.rs
//!
//! Writes the process id on startup, removes it on clean shutdown.

use std::path::{Path, PathBuf};

/// RAII guard owning an on-disk pid file. The file is removed when the
/// guard drops, so a clean shutdown always leaves no pid file behind.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Writes the current process id to `path`.
    pub fn create(path: &Path) -> std::io::Result<PidFile> {
        std::fs::write(path, format!("{}\n", std::process::id()))?;
        Ok(PidFile {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_pid_and_removes_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("router.pid");
        {
            let _guard = PidFile::create(&path).unwrap();
            let contents = std::fs::read_to_string(&path).unwrap();
            assert_eq!(contents.trim(), std::process::id().to_string());
        }
        assert!(!path.exists());
    }
}
