#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `router` is the file store's client-facing entry point. It owns `.c`
//! files locally and relays every other supported extension to its
//! owning shard over a fresh sub-connection, aggregating shard responses
//! for `dispfnames` and `downltar` (spec §4-§5).
//!
//! # Design
//!
//! One thread per accepted connection, matching the original's one
//! process (`fork`) per connection. Each session runs inside
//! [`std::panic::catch_unwind`] so a malformed command or a bug in one
//! session's handling can never bring down the accept loop — the
//! isolation this crate's tests exercise end to end over a real socket.
//!
//! # Errors
//!
//! [`RouterError`] covers socket setup failures, unreachable shards, and
//! errors bubbling up from [`storage`] and [`protocol`].

/// Router configuration, parsed with `clap`.
pub mod config;
/// Top-level error type.
pub mod error;
/// `--max-sessions` enforcement.
pub mod limiter;
/// Pid-file lifecycle.
pub mod pidfile;
/// Sub-connection relay to a shard.
pub mod shard_client;
/// Per-connection command dispatch.
pub mod session;

use std::net::TcpListener;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use storage::ManagedRoot;
use tracing::{error, info, warn};

pub use config::RouterConfig;
pub use error::RouterError;
use limiter::ConnectionLimiter;
use pidfile::PidFile;
use session::SessionContext;
use shard_client::ShardAddresses;

/// Binds the listening socket and serves client connections until the
/// process is asked to stop (or, with `--once`, after the first
/// connection completes).
pub fn run_router(config: RouterConfig) -> Result<(), RouterError> {
    let root = ManagedRoot::open(&config.home)?;
    let shards = ShardAddresses {
        pdf: config.pdf_addr.clone(),
        txt: config.txt_addr.clone(),
        zip: config.zip_addr.clone(),
    };
    let ctx = Arc::new(SessionContext { root, shards });

    let listener = TcpListener::bind(("0.0.0.0", config.port))?;
    info!(port = config.port, home = %config.home, "router listening");

    let _pid_file = match &config.pid_file {
        Some(path) => Some(PidFile::create(path)?),
        None => None,
    };
    let limiter = ConnectionLimiter::new(config.max_sessions.map(|n| n.get()));

    let mut workers = Vec::new();
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "error accepting connection");
                continue;
            }
        };

        let Some(guard) = limiter.acquire() else {
            warn!("rejecting connection: max-sessions reached");
            drop(stream);
            continue;
        };

        let ctx = Arc::clone(&ctx);
        let handle = thread::spawn(move || {
            let _guard = guard;
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
