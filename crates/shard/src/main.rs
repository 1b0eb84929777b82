//! crates/shard/src/main.rs

use clap::Parser;
use shard::{run_shard, ShardConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ShardConfig::parse();
    if let Err(e) = run_shard(config) {
        tracing::error!(error = %e, "shard exited with an error");
        std::process::exit(1);
    }
}
