#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `client` is the interactive `w25clients$ ` REPL: it validates
//! arguments locally the same way the original did (file existence,
//! supported extensions, the `~/S1` virtual-root prefix) before ever
//! opening a connection, then issues exactly one command per connection
//! to the router (spec §6).
//!
//! # Design
//!
//! [`commands`] holds one function per REPL verb; [`repl`] is the
//! read-dispatch-print loop around them, decoupled from `stdin`/`stdout`
//! so it can be driven by a string buffer in tests.

/// Per-command client logic (uploadf/downlf/removef/downltar/dispfnames).
pub mod commands;
/// Client configuration, parsed with `clap`.
pub mod config;
/// Error type for client-side command execution.
pub mod error;
/// The interactive read-dispatch-print loop.
pub mod repl;

pub use config::ClientConfig;
pub use error::ClientError;
