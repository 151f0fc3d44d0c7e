//! Resolve command - resolves one batch and prints the results

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::domain::{LookupRequest, OrderingPolicy};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// JSON file holding an array of lookups (stdin when omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output ordering, overriding `resolver.ordering`
    #[arg(long, value_enum)]
    pub ordering: Option<OrderingPolicy>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;
    if let Some(ordering) = args.ordering {
        config.resolver.ordering = ordering;
    }

    let input = super::read_input(args.input.as_deref())?;
    let batch = parse_batch(&input)?;

    config.upstream.require_api_key()?;

    let cache = crate::create_cache(&config).await?;
    let resolver = crate::create_resolver(&config, cache).await?;
    let outcome = resolver.resolve(&batch).await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&outcome.items)?
    } else {
        serde_json::to_string(&outcome.items)?
    };
    println!("{}", output);

    Ok(())
}

fn parse_batch(input: &str) -> anyhow::Result<Vec<LookupRequest>> {
    serde_json::from_str(input).context("Input must be a JSON array of lookup requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let batch = parse_batch(r#"[{"idType":"ID_ISIN","idValue":"US0378331005"}]"#).unwrap();

        assert_eq!(batch, vec![LookupRequest::new("ID_ISIN", "US0378331005")]);
    }

    #[test]
    fn test_parse_batch_rejects_object() {
        assert!(parse_batch(r#"{"idType":"TICKER","idValue":"AAPL"}"#).is_err());
    }
}
