use crate::error::SyncError;
use crate::importer::ImportOptions;
use crate::listing::NewListing;
use crate::product::ProductId;
use crate::report::SyncReport;

use super::{Prepared, SyncServices, prepare};

/// Lists a newly created remote product on every active channel and imports
/// it once per listing the remote creates.
pub struct ProductCreator {
    services: SyncServices,
}

impl ProductCreator {
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
        let request = [NewListing::for_product(&product)];

        for channel in &channels {
            let Some(remote_id) = channel.connected_remote_id() else {
                report.skipped += 1;
                continue;
            };

            tracing::debug!(%product_id, channel = %channel, remote_id, "creating listing");

            let listings = match self
                .services
                .catalog
                .create_listings(remote_id, &request)
                .await
            {
                Ok(listings) => listings,
                Err(source) => {
                    self.services.reporter.report_error(&SyncError::CreateListing {
                        product_id,
                        channel: channel.clone(),
                        source,
                    });
                    report.failed += 1;
                    continue;
                }
            };

            for listing in &listings {
                match self
                    .services
                    .importer
                    .import(&product, listing, channel, options)
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
        }

        report
    }
}
