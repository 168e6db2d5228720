//! Product re-synchronization.
//!
//! Both paths share the same preamble: resolve the active channels, refuse
//! to run without any, then fetch the full product. They differ in how they
//! obtain a listing per channel: [`ProductCreator`] creates one,
//! [`ProductUpdater`] looks up the one recorded locally and fetches it.
//!
//! Every failure is reported through the [`Reporter`] and never returned.
//! Failures scoped to a channel do not stop the remaining channels.

mod creator;
mod updater;

use std::sync::Arc;

pub use creator::ProductCreator;
pub use updater::ProductUpdater;

use crate::catalog::CatalogClient;
use crate::channel::{Channel, ChannelRegistry};
use crate::error::SyncError;
use crate::importer::ProductImporter;
use crate::listing::ListingIndex;
use crate::product::{Product, ProductId, ProductInclude};
use crate::report::{Reporter, SyncReport};

/// Collaborators a sync run works through.
#[derive(Clone)]
pub struct SyncServices {
    pub catalog: Arc<dyn CatalogClient>,
    pub channels: Arc<dyn ChannelRegistry>,
    pub listings: Arc<dyn ListingIndex>,
    pub importer: Arc<dyn ProductImporter>,
    pub reporter: Arc<dyn Reporter>,
}

/// A product fetched for a run, with the channels it should land on.
struct Prepared {
    product: Product,
    channels: Vec<Channel>,
}

/// Resolve channels and fetch the product. On failure the error has already
/// been reported and the aborted report is returned instead.
async fn prepare(services: &SyncServices, product_id: ProductId) -> Result<Prepared, SyncReport> {
    let channels = match services.channels.active_channels().await {
        Ok(channels) => channels,
        Err(e) => {
            services.reporter.report_error(&SyncError::Registry(e));
            return Err(SyncReport::aborted(product_id));
        }
    };

    if channels.is_empty() {
        services.reporter.report_error(&SyncError::NoChannelsConnected);
        return Err(SyncReport::aborted(product_id));
    }

    match services
        .catalog
        .product(product_id, &ProductInclude::FULL)
        .await
    {
        Ok(product) => Ok(Prepared { product, channels }),
        Err(source) => {
            services
                .reporter
                .report_error(&SyncError::FetchProduct { product_id, source });
            Err(SyncReport::aborted(product_id))
        }
    }
}
