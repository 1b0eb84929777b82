//! crates/client/src/config.rs

use clap::Parser;

/// Interactive client for the distributed file store.
#[derive(Debug, Clone, Parser)]
#[command(name = "w25clients", about = "Interactive client for the file store")]
pub struct ClientConfig {
    /// Address of the router to connect to.
    #[arg(long, default_value = "127.0.0.1:8386")]
    pub router_addr: String,
}
