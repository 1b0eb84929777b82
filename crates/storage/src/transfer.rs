//! crates/storage/src/transfer.rs
//!
//! Atomic receive-to-disk: every incoming payload lands in a sibling
//! `.part` file first and is renamed into place only once fully written,
//! so a connection that drops mid-transfer never leaves a half-written
//! file at the final name (spec §7's "known partial-failure gap" — fixed,
//! not merely documented, per SPEC_FULL.md).

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Writes exactly `len` bytes read from `source` to `dest`, via a sibling
/// `<name>.part` temp file that is renamed into place only on full
/// success. On any error the partial `.part` file is removed rather than
/// left behind.
pub fn receive_to_file<R: Read>(dest: &Path, source: &mut R, len: u64) -> Result<(), StorageError> {
    let part_path = part_path_for(dest);
    let result = write_part(&part_path, source, len);
    match result {
        Ok(()) => {
            std::fs::rename(&part_path, dest).map_err(|e| StorageError::io(dest, e))?;
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::remove_file(&part_path);
            Err(e)
        }
    }
}

fn write_part<R: Read>(part_path: &Path, source: &mut R, len: u64) -> Result<(), StorageError> {
    if let Some(parent) = part_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let file = File::create(part_path).map_err(|e| StorageError::io(part_path, e))?;
    let mut writer = BufWriter::new(file);
    protocol::io::copy_exact(source, &mut writer, len)
        .map_err(|e| StorageError::io(part_path, e))?;
    writer.flush().map_err(|e| StorageError::io(part_path, e))?;
    Ok(())
}

/// Derives the sibling temp-file name for a final destination, unique per
/// destination so two concurrent uploads to different names never collide
/// (spec §9, Open Question 4: the original used a single hardcoded temp
/// name shared by every in-flight download).
fn part_path_for(dest: &Path) -> PathBuf {
    let file_name = dest.file_name().unwrap_or_default().to_string_lossy();
    dest.with_file_name(format!("{file_name}.part"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writes_full_payload_and_renames_into_place() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("report.pdf");
        let mut source = Cursor::new(b"%PDF-1.4 fake content".to_vec());
        receive_to_file(&dest, &mut source, 21).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4 fake content");
        assert!(!part_path_for(&dest).exists());
    }

    #[test]
    fn removes_part_file_on_short_read() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("incomplete.txt");
        let mut source = Cursor::new(b"short".to_vec());
        let err = receive_to_file(&dest, &mut source, 999).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!dest.exists());
        assert!(!part_path_for(&dest).exists());
    }

    #[test]
    fn distinct_destinations_get_distinct_part_names() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        assert_ne!(part_path_for(&a), part_path_for(&b));
    }
}
