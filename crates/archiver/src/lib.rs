#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `archiver` builds the tar archive a shard or router returns for a
//! `downltar`/`CREATETAR` request: every regular file under a directory
//! matching a given extension, collected into one `.tar` stream.
//!
//! # Design
//!
//! The original implementation (`S1.c`/`S2.c`) shelled out to `find | tar`
//! twice per request: once to measure the resulting size, once to stream
//! it, reading the pipe's stdout fresh each time (spec §9, Open Question
//! 3). Nothing guarantees the directory is unchanged between the two
//! passes, so the announced size and the streamed bytes can disagree.
//!
//! [`TarArchiver`] instead builds the archive exactly once into a spooled
//! temp file, measures *that* file, and streams *that* file — size and
//! content are always consistent by construction. [`ExternalArchiver`]
//! keeps the subprocess-based approach available for parity with the
//! original's literal `find | tar` pipeline, but still spools to a single
//! temp file rather than invoking the pipeline twice.
//!
//! # Errors
//!
//! [`ArchiverError::NoFiles`] signals an empty input set, which callers
//! map to the wire's `NO_FILES` response rather than producing a
//! zero-entry archive.

mod error;

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

pub use error::ArchiverError;

/// Builds a tar archive of every file named in `files` (paths relative to
/// `base`), spooling into one temp file and returning it seeked to the
/// start, ready to be measured and streamed.
pub trait Archiver {
    /// Builds the archive, returning an open, rewound file handle.
    fn build(&self, base: &Path, files: &[String]) -> Result<File, ArchiverError>;
}

/// Builds the archive in-process using the `tar` crate, in a single pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarArchiver;

impl Archiver for TarArchiver {
    fn build(&self, base: &Path, files: &[String]) -> Result<File, ArchiverError> {
        if files.is_empty() {
            return Err(ArchiverError::NoFiles);
        }
        let spool = tempfile::tempfile()?;
        let mut builder = tar::Builder::new(spool);
        for name in files {
            let path = base.join(name);
            builder.append_path_with_name(&path, name)?;
        }
        let mut spool = builder.into_inner()?;
        spool.flush_and_rewind()?;
        Ok(spool)
    }
}

trait RewindExt {
    fn flush_and_rewind(&mut self) -> std::io::Result<()>;
}

impl RewindExt for File {
    fn flush_and_rewind(&mut self) -> std::io::Result<()> {
        self.sync_data()?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// Builds the archive by shelling out to the system `tar` binary, for
/// parity with the original's subprocess-based approach. Still a single
/// pass: the process writes directly into one spooled temp file instead
/// of being invoked once to measure and again to stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalArchiver;

impl Archiver for ExternalArchiver {
    fn build(&self, base: &Path, files: &[String]) -> Result<File, ArchiverError> {
        if files.is_empty() {
            return Err(ArchiverError::NoFiles);
        }
        let mut spool = tempfile::tempfile()?;
        let spool_path = std::env::temp_dir().join(format!("archiver-{}.tar", std::process::id()));

        let mut command = std::process::Command::new("tar");
        command
            .arg("-cf")
            .arg(&spool_path)
            .arg("-C")
            .arg(base)
            .args(files);
        let status = command.status()?;
        if !status.success() {
            let _ = std::fs::remove_file(&spool_path);
            return Err(ArchiverError::ExternalCommandFailed(status.to_string()));
        }

        let mut built = File::open(&spool_path)?;
        std::io::copy(&mut built, &mut spool)?;
        let _ = std::fs::remove_file(&spool_path);
        spool.flush_and_rewind()?;
        Ok(spool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn tar_archiver_rejects_empty_file_list() {
        let archiver = TarArchiver;
        let tmp = tempfile::tempdir().unwrap();
        let err = archiver.build(tmp.path(), &[]).unwrap_err();
        assert!(matches!(err, ArchiverError::NoFiles));
    }

    #[test]
    fn tar_archiver_builds_consistent_size_and_content() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), b"hello pdf").unwrap();
        std::fs::write(tmp.path().join("b.pdf"), b"second file contents").unwrap();

        let archiver = TarArchiver;
        let mut archive = archiver
            .build(tmp.path(), &["a.pdf".to_string(), "b.pdf".to_string()])
            .unwrap();

        let metadata_len = archive.metadata().unwrap().len();
        let mut buf = Vec::new();
        archive.read_to_end(&mut buf).unwrap();
        assert_eq!(metadata_len as usize, buf.len());

        let mut reader = tar::Archive::new(std::io::Cursor::new(buf));
        let names: Vec<String> = reader
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }
}
