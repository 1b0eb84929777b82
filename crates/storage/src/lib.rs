#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `storage` is the filesystem layer shared by the router and every
//! shard. It owns three things no peer should reimplement separately:
//!
//! - `~`-expansion against `$HOME` ([`home`]);
//! - validating that an externally supplied path actually lies under the
//!   process's own managed root before touching it ([`root`]);
//! - writing an incoming payload to a sibling `.part` file and renaming it
//!   into place only once complete ([`transfer`]), and listing a
//!   directory's files by extension ([`listing`]).
//!
//! # Design
//!
//! Every router and shard binary opens exactly one [`root::ManagedRoot`]
//! at startup and funnels every client- or peer-supplied path through
//! [`root::ManagedRoot::validate`] before it reaches the filesystem. This
//! closes the gap the original implementation's `S1.c` had: the router
//! checked `is_path_in_s1`, but a shard never re-validated a path handed
//! to it over a sub-connection.
//!
//! # Errors
//!
//! [`StorageError`] distinguishes a path escaping its root from plain I/O
//! failure, so callers can map the former to a client-facing `ERROR:`
//! response without leaking the latter's raw OS message.

/// Error type for filesystem home resolution, path validation, and
/// transfer writes.
pub mod error;
/// `~`-expansion against `$HOME`.
pub mod home;
/// Directory listing filtered by extension.
pub mod listing;
/// Shard-side path root enforcement.
pub mod root;
/// Atomic receive-to-disk writes.
pub mod transfer;

pub use error::StorageError;
pub use root::ManagedRoot;
