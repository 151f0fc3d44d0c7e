//! CLI module for the FIGI mapping cache
//!
//! - `serve`: HTTP API server
//! - `resolve`: resolve one batch from a file or stdin
//! - `invoke`: run a gateway event through the mapping or admin function
//! - `cache`: inspect and clear the cache
//! - `archive`: look up archived mappings

pub mod archive;
pub mod cache;
pub mod invoke;
pub mod resolve;
pub mod serve;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// FIGI mapping cache - cache-aside resolver for the OpenFIGI mapping API
#[derive(Parser)]
#[command(name = "figi-mapping-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Resolve a JSON array of lookups and print the results
    Resolve(resolve::ResolveArgs),

    /// Handle a gateway event and print the gateway response
    Invoke(invoke::InvokeArgs),

    /// Cache administration
    Cache(cache::CacheArgs),

    /// Print the archived mappings of one lookup identifier
    Archive(archive::ArchiveArgs),
}

/// Loads `.env`, the layered configuration and logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Reads a file, or stdin when the path is absent or `-`
pub(crate) fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_with_ordering() {
        let cli = Cli::parse_from(["figi-mapping-cache", "resolve", "batch.json", "--ordering", "hits_first"]);

        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.input.as_deref(), Some(Path::new("batch.json")));
                assert_eq!(args.ordering, Some(crate::domain::OrderingPolicy::HitsFirst));
            }
            _ => panic!("expected resolve command"),
        }
    }

    #[test]
    fn test_parse_archive() {
        let cli = Cli::parse_from(["figi-mapping-cache", "archive", "TICKER_AAPL", "--pretty"]);

        match cli.command {
            Command::Archive(args) => {
                assert_eq!(args.id, "TICKER_AAPL");
                assert!(args.pretty);
            }
            _ => panic!("expected archive command"),
        }
    }

    #[test]
    fn test_read_input_from_file() {
        let path = std::env::temp_dir().join("figi-mapping-cache-cli-input.json");
        std::fs::write(&path, "[]").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "[]");
        std::fs::remove_file(path).ok();
    }
}
