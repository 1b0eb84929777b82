#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `protocol` is the wire format shared by every peer in the file store:
//! client↔router and router↔shard both speak it. It owns three things:
//!
//! - the [`extension`] family and the `S1`→`S2`/`S3`/`S4` path translation
//!   ([`path`]);
//! - the line-oriented command grammar and handshake tokens ([`command`],
//!   [`handshake`]);
//! - buffered line framing and length-prefixed payload streaming
//!   ([`io`]), so neither a short read nor a single-syscall assumption can
//!   ever truncate a transfer.
//!
//! # Design
//!
//! Every command and status line is newline-terminated and read with
//! [`io::read_line_lossy`], never a single `read`/`recv` call. Every
//! byte-stream payload — uploads, downloads, and archives alike — is
//! preceded by an ASCII decimal size line acknowledged with `READY`
//! ([`io::send_payload`], [`io::recv_payload`]). This closes the two
//! framing bugs the original implementation carried: truncation on a
//! short read, and command lines relying on one read matching one write.
//!
//! # Invariants
//!
//! - [`path::translate`] only ever rewrites the first `S1` path segment; it
//!   is idempotent once applied.
//! - Every [`handshake::Response`] not granting a transfer begins with
//!   `ERROR:` or is one of the fixed sentinel tokens.
//!
//! # Errors
//!
//! [`ProtocolError`] covers malformed command lines, unknown extensions,
//! and the I/O errors that bubble up from framing helpers.

/// Extension family (`C`, `PDF`, `TXT`, `ZIP`) and shard-home mapping.
pub mod extension;
/// Client→router and router→shard command grammar.
pub mod command;
/// Handshake and status tokens exchanged around a payload transfer.
pub mod handshake;
/// Line framing and length-prefixed payload streaming.
pub mod io;
/// Virtual-root path translation (`~/S1/...` → `~/S<n>/...`).
pub mod path;

mod error;

pub use error::ProtocolError;
pub use extension::Extension;
