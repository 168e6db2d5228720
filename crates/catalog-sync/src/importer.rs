use std::sync::Arc;

use crate::channel::Channel;
use crate::listing::Listing;
use crate::product::Product;

/// Per-call switches for the importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// When set, the write must not trigger the importer's own listing
    /// maintenance (queueing the listing for a push back to the remote).
    /// Sync paths set this: the data they import already came from the
    /// remote and they manage the listing themselves.
    pub suppress_listing_mutation: bool,
}

impl ImportOptions {
    pub fn from_remote() -> Self {
        Self {
            suppress_listing_mutation: true,
        }
    }
}

/// Errors raised while persisting an imported product.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("listing {listing} belongs to product {listing_product}, not {product}")]
    Mismatch {
        listing: u64,
        listing_product: u64,
        product: u64,
    },
}

/// Writes a fetched product, its listing and channel into local storage.
#[async_trait::async_trait]
pub trait ProductImporter: Send + Sync {
    async fn import(
        &self,
        product: &Product,
        listing: &Listing,
        channel: &Channel,
        options: ImportOptions,
    ) -> Result<(), ImportError>;
}

#[async_trait::async_trait]
impl<T: ProductImporter + ?Sized> ProductImporter for Arc<T> {
    async fn import(
        &self,
        product: &Product,
        listing: &Listing,
        channel: &Channel,
        options: ImportOptions,
    ) -> Result<(), ImportError> {
        (**self).import(product, listing, channel, options).await
    }
}
