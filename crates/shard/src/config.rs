//! crates/shard/src/config.rs
//!
//! Shard configuration, parsed with [`clap`]'s derive API. Three near-
//! identical C programs (`S2.c`, `S3.c`, `S4.c`) collapse into this one
//! parameterized binary: which files a shard owns is a runtime flag, not
//! a compile-time constant.

use clap::Parser;
use protocol::Extension;

/// A typed shard: owns one extension family's files under its own root.
#[derive(Debug, Clone, Parser)]
#[command(name = "shard", about = "Owns one extension family's files")]
pub struct ShardConfig {
    /// Which extension family this shard owns.
    #[arg(long, value_parser = parse_extension)]
    pub extension: Extension,

    /// TCP port this shard listens on.
    #[arg(long)]
    pub port: u16,

    /// This shard's own filesystem root (e.g. `~/S2`).
    #[arg(long)]
    pub home: String,

    /// Exit after handling a single connection; used by integration tests.
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

fn parse_extension(raw: &str) -> Result<Extension, String> {
    raw.parse().map_err(|e: protocol::ProtocolError| e.to_string())
}

impl ShardConfig {
    /// Parses configuration from an explicit argument list, for tests and
    /// embedders that do not want to read `std::env::args`.
    pub fn from_iter<I, T>(args: I) -> Result<ShardConfig, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        ShardConfig::try_parse_from(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pdf_shard_config() {
        let config = ShardConfig::from_iter([
            "shard",
            "--extension",
            "pdf",
            "--port",
            "8387",
            "--home",
            "~/S2",
        ])
        .unwrap();
        assert_eq!(config.extension, Extension::Pdf);
        assert_eq!(config.port, 8387);
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(ShardConfig::from_iter(["shard", "--extension", "doc", "--port", "1", "--home", "~/S2"])
            .is_err());
    }
}
