#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `shard` is the one binary that stands in for the three original,
//! nearly-identical per-extension servers (`S2.c`, `S3.c`, `S4.c`): which
//! extension family and filesystem root it owns is a runtime flag
//! ([`config::ShardConfig`]), not three separately compiled programs.
//!
//! # Design
//!
//! One thread per accepted sub-connection, each servicing exactly one
//! command before the connection closes — the original never kept a
//! sub-connection alive across more than one `RECEIVE`/`SEND`/`REMOVE`/
//! `LIST`/`CREATETAR`. Every path received is re-validated against this
//! shard's own root ([`storage::ManagedRoot::validate`]) rather than
//! trusting the router (spec §9, Open Question 6).
//!
//! # Errors
//!
//! [`ShardError`] covers socket setup failures and errors bubbling up
//! from [`storage`].

/// Shard configuration, parsed with `clap`.
pub mod config;
/// Top-level error type.
pub mod error;
/// Per-connection command handling.
pub mod session;

use std::net::TcpListener;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use storage::ManagedRoot;
use tracing::{error, info, warn};

pub use config::ShardConfig;
pub use error::ShardError;
use session::ShardContext;

/// Binds the listening socket and serves sub-connections until the
/// process is asked to stop (or, with `--once`, after the first
/// connection completes).
pub fn run_shard(config: ShardConfig) -> Result<(), ShardError> {
    let root = ManagedRoot::open(&config.home)?;
    let ctx = Arc::new(ShardContext {
        root,
        extension: config.extension,
    });

    let listener = TcpListener::bind(("0.0.0.0", config.port))?;
    info!(port = config.port, extension = config.extension.tag(), "shard listening");

    let mut workers = Vec::new();
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "error accepting connection");
                continue;
            }
        };

        let ctx = Arc::clone(&ctx);
        let handle = thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| session::handle_session(stream, &ctx)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "session ended with an I/O error"),
                Err(_) => error!("session panicked; isolated from the accept loop"),
            }
        });
        workers.push(handle);
        workers.retain(|h: &thread::JoinHandle<()>| !h.is_finished());

        if config.once {
            break;
        }
    }

    for handle in workers {
        let _ = handle.join();
    }
    Ok(())
}
