use clap::Parser;
use figi_mapping_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Resolve(args) => cli::resolve::run(args).await,
        Command::Invoke(args) => cli::invoke::run(args).await,
        Command::Cache(args) => cli::cache::run(args).await,
        Command::Archive(args) => cli::archive::run(args).await,
    }
}
