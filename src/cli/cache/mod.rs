//! Cache command - administration of the mapping cache

use clap::{Args, Subcommand};

use crate::infrastructure::services::CacheAdminService;

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// List every cached key
    Keys,
    /// Print the stored value of one key
    Get { key: String },
    /// Delete one key
    Delete { key: String },
    /// Remove every cached mapping
    Flush,
}

pub async fn run(args: CacheArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let admin = CacheAdminService::new(crate::create_cache(&config).await?);

    match args.action {
        CacheAction::Keys => {
            for key in admin.list_keys().await? {
                println!("{}", key);
            }
        }
        CacheAction::Get { key } => println!("{}", admin.get_key(&key).await?),
        CacheAction::Delete { key } => println!("{}", admin.delete_key(&key).await?),
        CacheAction::Flush => {
            admin.flush().await?;
            println!("true");
        }
    }

    Ok(())
}
