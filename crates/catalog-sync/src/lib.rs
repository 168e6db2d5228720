pub mod catalog;
pub mod channel;
pub mod error;
pub mod importer;
pub mod listing;
pub mod product;
pub mod report;
pub mod sync;
pub mod webhook;

pub use catalog::{ApiError, CatalogClient};
pub use channel::{Channel, ChannelRegistry, RegistryError};
pub use error::SyncError;
pub use importer::{ImportError, ImportOptions, ProductImporter};
pub use listing::{
    Listing, ListingId, ListingIndex, ListingState, LookupError, NewListing, NewVariantListing,
    VariantListing,
};
pub use product::{Product, ProductId, ProductInclude, Variant};
pub use report::{Reporter, SyncReport, TracingReporter};
pub use sync::{ProductCreator, ProductUpdater, SyncServices};
pub use webhook::{ProductEvent, WebhookDispatcher, WebhookError, WebhookPayload};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
