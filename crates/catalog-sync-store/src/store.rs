use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use catalog_sync::{
    Channel, ChannelRegistry, ImportError, ImportOptions, Listing, ListingId, ListingIndex,
    ListingState, LookupError, Product, ProductId, ProductImporter, RegistryError,
};
use rusqlite::OptionalExtension;

use crate::schema;

/// Local post status of an imported product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Publish,
    Draft,
}

impl ProductStatus {
    fn for_listing(state: ListingState) -> Self {
        match state {
            ListingState::Active => Self::Publish,
            _ => Self::Draft,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "publish" => Self::Publish,
            _ => Self::Draft,
        }
    }
}

/// A channel row together with its activation flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub channel: Channel,
    pub active: bool,
}

/// A product as stored for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub product_id: ProductId,
    pub channel_id: u64,
    pub listing_id: Option<ListingId>,
    pub listing_state: ListingState,
    pub name: String,
    pub is_visible: bool,
    pub status: ProductStatus,
    pub payload: serde_json::Value,
    /// Local changes not yet pushed to the remote listing.
    pub pending_push: bool,
}

/// SQLite-backed local catalog.
///
/// Serves as the channel registry, the local listing index and the product
/// importer for sync runs.
pub struct CatalogStore {
    conn: Mutex<rusqlite::Connection>,
}

impl CatalogStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            rusqlite::Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: rusqlite::Connection) -> Result<Self, StoreError> {
        schema::migrations()
            .to_latest(&mut conn)
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".into()))
    }

    /// Insert or replace a channel.
    pub fn upsert_channel(&self, channel: &Channel, active: bool) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO channels (id, name, remote_id, active) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                remote_id = excluded.remote_id,
                active = excluded.active",
            rusqlite::params![channel.id, channel.name, channel.remote_id, active],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Toggle whether a channel takes part in sync. Returns false when the
    /// channel does not exist.
    pub fn set_channel_active(&self, id: u64, active: bool) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE channels SET active = ?2 WHERE id = ?1",
                rusqlite::params![id, active],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    /// All channels, active or not, ordered by id.
    pub fn channels(&self) -> Result<Vec<ChannelRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, remote_id, active FROM channels ORDER BY id")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let records = stmt
            .query_map([], |row| {
                Ok(ChannelRecord {
                    channel: Channel::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?),
                    active: row.get(3)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Save a local edit of a product on a channel.
    ///
    /// The existing listing link is kept. The row is flagged for a push back
    /// to the remote listing and shows up in [`CatalogStore::pending_pushes`]
    /// until a remote import clears it.
    pub fn save_local_product(&self, product: &Product, channel: &Channel) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(product).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let state = ListingState::for_product(product);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO product_listings
                (product_id, channel_id, listing_id, listing_state, name, is_visible, status,
                 payload_json, pending_push, imported_at)
             VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, 1, ?8)
             ON CONFLICT (product_id, channel_id) DO UPDATE SET
                listing_state = excluded.listing_state,
                name = excluded.name,
                is_visible = excluded.is_visible,
                status = excluded.status,
                payload_json = excluded.payload_json,
                pending_push = 1",
            rusqlite::params![
                product.id.get(),
                channel.id,
                state.as_str(),
                product.name,
                product.is_visible,
                ProductStatus::for_listing(state).as_str(),
                payload,
                now_epoch_secs(),
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// The stored row for a product on a channel, whatever its status.
    pub fn record(
        &self,
        product_id: ProductId,
        channel_id: u64,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT product_id, channel_id, listing_id, listing_state, name, is_visible, status,
                    payload_json, pending_push
             FROM product_listings
             WHERE product_id = ?1 AND channel_id = ?2",
            rusqlite::params![product_id.get(), channel_id],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Rows with local changes waiting to be pushed to the remote.
    pub fn pending_pushes(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT product_id, channel_id, listing_id, listing_state, name, is_visible, status,
                        payload_json, pending_push
                 FROM product_listings
                 WHERE pending_push = 1
                 ORDER BY product_id, channel_id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let records = stmt
            .query_map([], Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(records)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ProductRecord> {
        let product_id: u64 = row.get(0)?;
        let channel_id: u64 = row.get(1)?;
        let listing_id: Option<u64> = row.get(2)?;
        let listing_state: String = row.get(3)?;
        let name: String = row.get(4)?;
        let is_visible: bool = row.get(5)?;
        let status: String = row.get(6)?;
        let payload_json: String = row.get(7)?;
        let pending_push: bool = row.get(8)?;

        // Product ids are written from validated `ProductId`s and never zero.
        let product_id =
            ProductId::new(product_id).ok_or(rusqlite::Error::IntegralValueOutOfRange(0, 0))?;

        Ok(ProductRecord {
            product_id,
            channel_id,
            listing_id: listing_id.filter(|id| *id > 0).map(ListingId),
            listing_state: ListingState::parse(&listing_state),
            name,
            is_visible,
            status: ProductStatus::parse(&status),
            payload: serde_json::from_str(&payload_json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
            })?,
            pending_push,
        })
    }
}

#[async_trait::async_trait]
impl ChannelRegistry for CatalogStore {
    async fn active_channels(&self) -> Result<Vec<Channel>, RegistryError> {
        let records = self
            .channels()
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(records
            .into_iter()
            .filter(|r| r.active)
            .map(|r| r.channel)
            .collect())
    }
}

#[async_trait::async_trait]
impl ListingIndex for CatalogStore {
    async fn listing_id(
        &self,
        product_id: ProductId,
        channel: &Channel,
    ) -> Result<Option<ListingId>, LookupError> {
        let record = self
            .record(product_id, channel.id)
            .map_err(|e| LookupError::Storage(e.to_string()))?;

        Ok(record.and_then(|r| r.listing_id))
    }
}

#[async_trait::async_trait]
impl ProductImporter for CatalogStore {
    async fn import(
        &self,
        product: &Product,
        listing: &Listing,
        channel: &Channel,
        options: ImportOptions,
    ) -> Result<(), ImportError> {
        if listing.product_id != product.id {
            return Err(ImportError::Mismatch {
                listing: listing.listing_id.0,
                listing_product: listing.product_id.get(),
                product: product.id.get(),
            });
        }

        let payload = serde_json::to_string(product)
            .map_err(|e| ImportError::Storage(format!("failed to encode product: {e}")))?;
        let pending_push = !options.suppress_listing_mutation;

        let conn = self
            .conn()
            .map_err(|e| ImportError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO product_listings
                (product_id, channel_id, listing_id, listing_state, name, is_visible, status,
                 payload_json, pending_push, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (product_id, channel_id) DO UPDATE SET
                listing_id = excluded.listing_id,
                listing_state = excluded.listing_state,
                name = excluded.name,
                is_visible = excluded.is_visible,
                status = excluded.status,
                payload_json = excluded.payload_json,
                pending_push = excluded.pending_push,
                imported_at = excluded.imported_at",
            rusqlite::params![
                product.id.get(),
                channel.id,
                listing.listing_id.0,
                listing.state.as_str(),
                product.name,
                product.is_visible,
                ProductStatus::for_listing(listing.state).as_str(),
                payload,
                pending_push,
                now_epoch_secs(),
            ],
        )
        .map_err(|e| ImportError::Storage(e.to_string()))?;

        tracing::debug!(
            product_id = %product.id,
            channel = %channel,
            listing_id = %listing.listing_id,
            pending_push,
            "imported product"
        );

        Ok(())
    }
}

/// Errors specific to store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

fn now_epoch_secs() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.to_string()
}

#[cfg(test)]
mod tests {
    use catalog_sync::test_support::sample_product;

    use super::*;

    #[test]
    fn corrupt_payload_surfaces_as_error() {
        let store = CatalogStore::open_in_memory().unwrap();
        let channel = Channel::new(1, "Storefront", Some(10));
        store.upsert_channel(&channel, true).unwrap();
        let product = sample_product(7, true, &[]);
        store.save_local_product(&product, &channel).unwrap();

        store
            .conn()
            .unwrap()
            .execute("UPDATE product_listings SET payload_json = 'not json'", [])
            .unwrap();

        assert!(matches!(
            store.record(product.id, 1),
            Err(StoreError::Database(_))
        ));
        assert!(store.pending_pushes().is_err());
    }
}
