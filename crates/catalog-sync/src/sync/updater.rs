use crate::error::SyncError;
use crate::importer::ImportOptions;
use crate::product::ProductId;
use crate::report::SyncReport;

use super::{Prepared, SyncServices, prepare};

/// Refreshes an already imported product on every channel it is listed on.
///
/// The listing for each channel is the one recorded locally; channels with
/// no recorded listing are skipped rather than created.
pub struct ProductUpdater {
    services: SyncServices,
}

impl ProductUpdater {
    pub fn new(services: SyncServices) -> Self {
        Self { services }
    }

    pub async fn run(&self, product_id: ProductId) -> SyncReport {
        let options = ImportOptions::from_remote();

        let Prepared { product, channels } = match prepare(&self.services, product_id).await {
            Ok(prepared) => prepared,
            Err(report) => return report,
        };

        let mut report = SyncReport::new(product_id);

        for channel in &channels {
            let Some(remote_id) = channel.connected_remote_id() else {
                report.skipped += 1;
                continue;
            };

            let listing_id = match self.services.listings.listing_id(product_id, channel).await {
                Ok(Some(listing_id)) => listing_id,
                Ok(None) => {
                    self.services.reporter.report_skip(
                        product_id,
                        channel,
                        &format!(
                            "no local listing for product {product_id} on channel {channel}"
                        ),
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(source) => {
                    self.services.reporter.report_error(&SyncError::Lookup {
                        product_id,
                        channel: channel.clone(),
                        source,
                    });
                    report.failed += 1;
                    continue;
                }
            };

            tracing::debug!(%product_id, channel = %channel, %listing_id, "refreshing listing");

            let listing = match self.services.catalog.listing(remote_id, listing_id).await {
                Ok(listing) => listing,
                Err(source) => {
                    self.services.reporter.report_error(&SyncError::FetchListing {
                        product_id,
                        channel: channel.clone(),
                        listing_id,
                        source,
                    });
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .services
                .importer
                .import(&product, &listing, channel, options)
                .await
            {
                Ok(()) => report.imported += 1,
                Err(source) => {
                    self.services.reporter.report_error(&SyncError::Import {
                        product_id,
                        channel: channel.clone(),
                        source,
                    });
                    report.failed += 1;
                }
            }
        }

        report
    }
}
