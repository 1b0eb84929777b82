//! crates/router/src/config.rs
//!
//! Router configuration, parsed with [`clap`]'s derive API (spec §6).

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

/// The client-facing file store router.
#[derive(Debug, Clone, Parser)]
#[command(name = "router", about = "Client-facing entry point for the file store")]
pub struct RouterConfig {
    /// TCP port clients connect to.
    #[arg(long, default_value_t = 8386)]
    pub port: u16,

    /// Virtual root this router owns locally (`.c` files).
    #[arg(long, default_value = "~/S1")]
    pub home: String,

    /// Address of the shard owning `.pdf` files.
    #[arg(long, default_value = "127.0.0.1:8387")]
    pub pdf_addr: String,

    /// Address of the shard owning `.txt` files.
    #[arg(long, default_value = "127.0.0.1:8388")]
    pub txt_addr: String,

    /// Address of the shard owning `.zip` files.
    #[arg(long, default_value = "127.0.0.1:8389")]
    pub zip_addr: String,

    /// Maximum number of simultaneously active client sessions.
    #[arg(long)]
    pub max_sessions: Option<NonZeroUsize>,

    /// Write the process id to this file on startup and remove it on
    /// clean shutdown.
    #[arg(long)]
    pub pid_file: Option<PathBuf>,

    /// Exit after handling a single connection; used by integration tests
    /// to bound the accept loop's lifetime.
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

impl RouterConfig {
    /// Parses configuration from an explicit argument list, for tests and
    /// embedders that do not want to read `std::env::args`.
    pub fn from_iter<I, T>(args: I) -> Result<RouterConfig, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        RouterConfig::try_parse_from(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_ports() {
        let config = RouterConfig::from_iter(["router"]).unwrap();
        assert_eq!(config.port, 8386);
        assert_eq!(config.pdf_addr, "127.0.0.1:8387");
        assert_eq!(config.txt_addr, "127.0.0.1:8388");
        assert_eq!(config.zip_addr, "127.0.0.1:8389");
        assert_eq!(config.home, "~/S1");
        assert!(!config.once);
    }

    #[test]
    fn parses_overrides() {
        let config = RouterConfig::from_iter([
            "router",
            "--port",
            "9000",
            "--max-sessions",
            "4",
            "--once",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_sessions.unwrap().get(), 4);
        assert!(config.once);
    }
}
