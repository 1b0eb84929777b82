//! crates/storage/src/listing.rs
//!
//! Directory listing filtered to one extension family, grounded on the
//! original's `readdir` loop in the `dispfnames` handler (S1.c). Entries
//! are sorted lexicographically; the original relied on directory-entry
//! order, which is unspecified by POSIX and not reproducible across
//! filesystems.

use std::path::Path;

use protocol::Extension;

use crate::error::StorageError;

/// Lists the base names of regular files directly inside `dir` whose
/// extension matches `ext`, sorted lexicographically.
///
/// A directory that does not exist yields an empty list rather than an
/// error, matching the aggregate `dispfnames` behavior of silently
/// skipping a shard that has nothing for this path.
pub fn list_by_extension(dir: &Path, ext: Extension) -> Result<Vec<String>, StorageError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| StorageError::io(dir, e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if Extension::from_filename(&name) == Some(ext) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Lists every regular file anywhere under `dir` whose extension matches
/// `ext`, as `dir`-relative paths using `/` separators, sorted
/// lexicographically.
///
/// Unlike [`list_by_extension`], this descends into subdirectories. It
/// backs the archive commands (`downltar`/`CREATETAR`), which the wire
/// protocol defines over a whole subtree, not just a directory's direct
/// entries — the original's `find "%s" -name "*.<ext>" -type f` (S2.c)
/// walked recursively for the same reason. `dispfnames` must stay
/// non-recursive and keeps using [`list_by_extension`].
pub fn list_by_extension_recursive(dir: &Path, ext: Extension) -> Result<Vec<String>, StorageError> {
    let mut names = Vec::new();
    walk(dir, "", ext, &mut names)?;
    names.sort();
    Ok(names)
}

fn walk(dir: &Path, prefix: &str, ext: Extension, names: &mut Vec<String>) -> Result<(), StorageError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(StorageError::io(dir, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| StorageError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        if file_type.is_dir() {
            walk(&dir.join(&name), &relative, ext, names)?;
        } else if file_type.is_file() && Extension::from_filename(&name) == Some(ext) {
            names.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_matching_extension_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "notes.txt", "img.zip"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let names = list_by_extension(tmp.path(), Extension::Pdf).unwrap();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn skips_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub.pdf")).unwrap();
        std::fs::write(tmp.path().join("real.pdf"), b"x").unwrap();
        let names = list_by_extension(tmp.path(), Extension::Pdf).unwrap();
        assert_eq!(names, vec!["real.pdf"]);
    }

    #[test]
    fn missing_directory_yields_empty_list() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        assert_eq!(list_by_extension(&missing, Extension::Txt).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn recursive_listing_descends_into_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs/nested")).unwrap();
        std::fs::write(tmp.path().join("top.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("docs/note.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("docs/nested/deep.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("docs/ignored.txt"), b"x").unwrap();

        let names = list_by_extension_recursive(tmp.path(), Extension::Pdf).unwrap();
        assert_eq!(
            names,
            vec!["docs/nested/deep.pdf", "docs/note.pdf", "top.pdf"]
        );
    }

    #[test]
    fn recursive_listing_of_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        assert_eq!(
            list_by_extension_recursive(&missing, Extension::Pdf).unwrap(),
            Vec::<String>::new()
        );
    }
}
