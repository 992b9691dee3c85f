use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedsync_core::server::{self, SharedCatalog};
use feedsync_core::storage::{Database, SqliteFeedCatalog};
use feedsync_core::AppConfig;

#[derive(Parser)]
#[command(name = "feedsyncd")]
#[command(author, version, about = "Serve the feedsync feed catalog over HTTP")]
struct Cli {
    /// Address to listen on, overriding the configured host and port
    #[arg(short, long)]
    listen: Option<String>,

    /// SQLite database file, overriding the configured location
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = cli.database.unwrap_or_else(|| config.database_path());
    let db = Database::open(&db_path).await?;
    let catalog: SharedCatalog = Arc::new(SqliteFeedCatalog::new(db));

    let addr = cli.listen.unwrap_or_else(|| config.server_addr());

    server::serve(&addr, catalog, async {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
    })
    .await?;

    Ok(())
}
