use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedsync_core::{AppConfig, Session};

mod commands;

#[derive(Parser)]
#[command(name = "feedsync")]
#[command(author, version, about = "Forward new RSS/Atom articles to your read-later list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all subscriptions
    List,
    /// Subscribe to a feed
    Add {
        /// RSS/Atom feed URL
        link: String,
        /// Sync the new feed right away
        #[arg(long)]
        sync: bool,
    },
    /// Unsubscribe from a feed
    Remove {
        /// Position of the subscription as shown by `list`
        index: usize,
    },
    /// Push new articles from every feed
    Sync,
    /// Authorize feedsync against the read-later service
    Authenticate {
        /// Replace existing credentials
        #[arg(long)]
        overwrite: bool,
        /// Consumer key of the registered application
        #[arg(long = "consumer-key")]
        consumer_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut session = Session::open(AppConfig::state_path())?;

    match cli.command {
        Commands::List => commands::list::run(&session),
        Commands::Add { link, sync } => commands::add::run(&mut session, &config, &link, sync).await,
        Commands::Remove { index } => commands::remove::run(&mut session, index),
        Commands::Sync => commands::sync::run(&mut session, &config).await,
        Commands::Authenticate {
            overwrite,
            consumer_key,
        } => commands::authenticate::run(&mut session, &config, overwrite, consumer_key).await,
    }
}
