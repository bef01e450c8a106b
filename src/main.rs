mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use pagebox::config::Config;
use pagebox::observability;
use pagebox::pages::PageStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_with_secrets(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Server(args) => pagebox::api::run(config, args.address).await?,
        Commands::Purge => {
            let store = PageStore::new(config.storage.root_dir);
            let removed = store.purge().await?;
            info!(removed, root = %store.root().display(), "Page directory purged");
        }
    }

    Ok(())
}
