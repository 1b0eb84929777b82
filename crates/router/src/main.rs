//! crates/router/src/main.rs

use clap::Parser;
use router::{run_router, RouterConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = RouterConfig::parse();
    if let Err(e) = run_router(config) {
        tracing::error!(error = %e, "router exited with an error");
        std::process::exit(1);
    }
}
