use anyhow::{Context, Result};
use catalog_sync::{ProductCreator, ProductId, ProductUpdater, SyncReport, SyncServices};

/// Which sync path a manual resync takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncMode {
    /// Create listings for a product new to the local catalog.
    Create,
    /// Refresh the listings already recorded locally.
    Update,
}

/// Run a manual resync and print the outcome.
pub async fn run(services: SyncServices, mode: ResyncMode, product_id: u64) -> Result<SyncReport> {
    let product_id = ProductId::new(product_id).context("product id must be positive")?;

    tracing::info!(%product_id, ?mode, "manual resync requested");

    let report = match mode {
        ResyncMode::Create => ProductCreator::new(services).run(product_id).await,
        ResyncMode::Update => ProductUpdater::new(services).run(product_id).await,
    };

    println!("{report}");
    Ok(report)
}
