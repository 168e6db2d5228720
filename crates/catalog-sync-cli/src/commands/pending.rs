use anyhow::Result;
use catalog_sync_store::{CatalogStore, ProductRecord};

/// Print products with local edits that still have to be pushed to their
/// remote listing.
pub fn list(store: &CatalogStore) -> Result<()> {
    let records = store.pending_pushes()?;

    if records.is_empty() {
        println!("Nothing waiting to be pushed.");
        return Ok(());
    }

    for record in &records {
        println!("{}", describe(record));
    }

    Ok(())
}

fn describe(record: &ProductRecord) -> String {
    let listing = record
        .listing_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{:>8}  channel={:<6}  listing={:<8}  {}",
        record.product_id, record.channel_id, listing, record.name
    )
}
