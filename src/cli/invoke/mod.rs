//! Invoke command - runs a gateway event through one of the functions

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};

use crate::api::envelope::{handle_admin_event, handle_mapping_event, GatewayEvent};
use crate::infrastructure::services::CacheAdminService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Function {
    /// Batch mapping resolution
    Mapping,
    /// Cache administration
    Admin,
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Function handling the event
    #[arg(long, value_enum, default_value_t = Function::Mapping)]
    pub function: Function,

    /// JSON file holding the gateway event (stdin when omitted or `-`)
    pub event: Option<PathBuf>,
}

pub async fn run(args: InvokeArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let input = super::read_input(args.event.as_deref())?;
    let event: GatewayEvent =
        serde_json::from_str(&input).context("Input must be a gateway event object")?;

    if args.function == Function::Mapping {
        config.upstream.require_api_key()?;
    }

    let cache = crate::create_cache(&config).await?;

    let response = match args.function {
        Function::Mapping => {
            let resolver = crate::create_resolver(&config, cache).await?;
            handle_mapping_event(&resolver, &event).await
        }
        Function::Admin => handle_admin_event(&CacheAdminService::new(cache), &event).await,
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
