//! Archive command - looks up archived mappings

use anyhow::bail;
use clap::Args;
use tracing::debug;

use crate::domain::archive::{ArchivedMapping, MappingArchive};
use crate::infrastructure::archive::ArchiveFactory;

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Lookup identifier (`idType_idValue`, e.g. `TICKER_AAPL`)
    pub id: String,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ArchiveArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let Some(archive) = ArchiveFactory::create(&config.archive).await? else {
        bail!("Mapping archive is disabled (set archive.enabled = true)");
    };

    let records = lookup(archive.as_ref(), &args.id).await?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", output);

    Ok(())
}

async fn lookup(archive: &dyn MappingArchive, id: &str) -> anyhow::Result<Vec<ArchivedMapping>> {
    let records = archive.find_by_id(id).await?;
    debug!(id = %id, count = records.len(), "Archive lookup");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archive::flatten_mapping;
    use crate::domain::{derive_key, LookupRequest, MappingResult};
    use crate::infrastructure::archive::InMemoryMappingArchive;
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_returns_archived_records() {
        let archive = InMemoryMappingArchive::new();
        let key = derive_key(&LookupRequest::new("TICKER", "AAPL")).unwrap();
        let result = MappingResult::new(json!({"data": [{"figi": "BBG000B9XRY4"}]}));
        archive.store(flatten_mapping(&key, &result)).await.unwrap();

        let records = lookup(&archive, "TICKER_AAPL").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].figi.as_deref(), Some("BBG000B9XRY4"));

        assert!(lookup(&archive, "TICKER_IBM").await.unwrap().is_empty());
    }
}
