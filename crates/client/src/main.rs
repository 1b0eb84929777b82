//! crates/client/src/main.rs

use clap::Parser;
use client::{repl, ClientConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::parse();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = repl::run(&config.router_addr, stdin.lock(), stdout.lock()) {
        tracing::error!(error = %e, "client exited with an error");
        std::process::exit(1);
    }
}
