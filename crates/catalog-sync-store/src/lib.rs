mod schema;
mod store;

pub use store::{CatalogStore, ChannelRecord, ProductRecord, ProductStatus, StoreError};
