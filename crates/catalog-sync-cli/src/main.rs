mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_sync::{SyncReport, SyncServices, TracingReporter};
use catalog_sync_bigcommerce::BigCommerceClient;
use catalog_sync_store::CatalogStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::resync::ResyncMode;
use crate::config::{ACCESS_TOKEN_ENV, AppConfig};

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Keep local product listings in step with the remote catalog")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create listings for a product on every active channel and import it
    Create {
        /// Remote product id
        product_id: u64,
    },
    /// Refresh a product on every channel it is already listed on
    Update {
        /// Remote product id
        product_id: u64,
    },
    /// Handle a webhook delivery body
    Webhook {
        /// Read the body from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List local edits waiting to be pushed to the remote
    Pending,
    /// Manage sales channels
    Channels {
        #[command(subcommand)]
        command: ChannelsCommand,
    },
}

#[derive(Subcommand)]
enum ChannelsCommand {
    /// List configured channels
    List,
    /// Add or replace a channel
    Add {
        /// Local channel id
        #[arg(long)]
        id: u64,
        /// Display name
        #[arg(long)]
        name: String,
        /// Channel id on the remote platform
        #[arg(long)]
        remote_id: Option<u64>,
        /// Store the channel without activating it
        #[arg(long)]
        inactive: bool,
    },
    /// Include a channel in sync runs
    Enable { id: u64 },
    /// Exclude a channel from sync runs
    Disable { id: u64 },
}

fn open_store(config: &AppConfig) -> Result<CatalogStore> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory: {}", parent.display()))?;
    }
    CatalogStore::open(&path).map_err(|e| anyhow::anyhow!("{e}"))
}

fn build_services(config: &AppConfig) -> Result<SyncServices> {
    let remote = config.bigcommerce(std::env::var(ACCESS_TOKEN_ENV).ok())?;
    let client = BigCommerceClient::new(remote).context("failed to set up remote client")?;
    let store = Arc::new(open_store(config)?);

    Ok(SyncServices {
        catalog: Arc::new(client),
        channels: store.clone(),
        listings: store.clone(),
        importer: store,
        reporter: Arc::new(TracingReporter),
    })
}

/// Aborted runs exit non-zero so callers can retry the delivery.
fn finish(report: SyncReport) -> Result<()> {
    if report.aborted {
        anyhow::bail!("sync for product {} was aborted", report.product_id);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app_config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Create { product_id } => {
            let services = build_services(&app_config)?;
            finish(commands::resync::run(services, ResyncMode::Create, product_id).await?)
        }
        Command::Update { product_id } => {
            let services = build_services(&app_config)?;
            finish(commands::resync::run(services, ResyncMode::Update, product_id).await?)
        }
        Command::Webhook { file } => {
            let body = commands::webhook::read_body(file.as_deref())?;
            let services = build_services(&app_config)?;
            finish(commands::webhook::run(services, &body).await?)
        }
        Command::Pending => commands::pending::list(&open_store(&app_config)?),
        Command::Channels { command } => {
            let store = open_store(&app_config)?;
            match command {
                ChannelsCommand::List => commands::channels::list(&store),
                ChannelsCommand::Add {
                    id,
                    name,
                    remote_id,
                    inactive,
                } => commands::channels::add(&store, id, &name, remote_id, !inactive),
                ChannelsCommand::Enable { id } => commands::channels::set_active(&store, id, true),
                ChannelsCommand::Disable { id } => {
                    commands::channels::set_active(&store, id, false)
                }
            }
        }
    }
}
