use catalog_sync::test_support::sample_product;
use catalog_sync::{
    Channel, ChannelRegistry, ImportError, ImportOptions, Listing, ListingId, ListingIndex,
    ListingState, ProductId, ProductImporter,
};
use catalog_sync_store::{CatalogStore, ProductStatus};

fn create_store() -> CatalogStore {
    CatalogStore::open_in_memory().unwrap()
}

fn listing_for(product_id: u64, channel_id: u64, listing_id: u64, state: ListingState) -> Listing {
    Listing {
        listing_id: ListingId(listing_id),
        channel_id,
        product_id: ProductId::new(product_id).unwrap(),
        state,
        name: None,
        variants: vec![],
    }
}

#[tokio::test]
async fn active_channels_excludes_disabled() {
    let store = create_store();
    store.upsert_channel(&Channel::new(1, "Storefront", Some(10)), true).unwrap();
    store.upsert_channel(&Channel::new(2, "Marketplace", Some(20)), false).unwrap();
    store.upsert_channel(&Channel::new(3, "Pending", None), true).unwrap();

    let active = store.active_channels().await.unwrap();
    let ids: Vec<u64> = active.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(active[1].remote_id, None);

    assert_eq!(store.channels().unwrap().len(), 3);
}

#[tokio::test]
async fn set_channel_active_toggles_and_reports_missing() {
    let store = create_store();
    store.upsert_channel(&Channel::new(1, "Storefront", Some(10)), true).unwrap();

    assert!(store.set_channel_active(1, false).unwrap());
    assert!(store.active_channels().await.unwrap().is_empty());

    assert!(!store.set_channel_active(99, true).unwrap());
}

#[tokio::test]
async fn large_ids_round_trip_and_out_of_range_ids_fail() {
    let store = create_store();
    let big = i64::MAX as u64;
    store.upsert_channel(&Channel::new(big, "Wide", Some(big)), true).unwrap();

    let active = store.active_channels().await.unwrap();
    assert_eq!(active[0].id, big);
    assert_eq!(active[0].remote_id, Some(big));

    assert!(store.upsert_channel(&Channel::new(u64::MAX, "Too wide", None), true).is_err());
}

#[tokio::test]
async fn upsert_channel_updates_remote_id() {
    let store = create_store();
    store.upsert_channel(&Channel::new(1, "Storefront", None), true).unwrap();
    store.upsert_channel(&Channel::new(1, "Storefront", Some(10)), true).unwrap();

    let channels = store.channels().unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].channel.remote_id, Some(10));
}

#[tokio::test]
async fn lookup_missing_record_is_none() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();

    let found = store
        .listing_id(ProductId::new(7).unwrap(), &channel)
        .await
        .unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn import_records_listing_and_lookup_finds_it() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, true, &[(1, false)]);

    store
        .import(
            &product,
            &listing_for(7, 10, 999, ListingState::Active),
            &channel,
            ImportOptions::from_remote(),
        )
        .await
        .unwrap();

    let found = store.listing_id(product.id, &channel).await.unwrap();
    assert_eq!(found, Some(ListingId(999)));

    let record = store.record(product.id, 1).unwrap().unwrap();
    assert_eq!(record.name, "Product 7");
    assert_eq!(record.status, ProductStatus::Publish);
    assert_eq!(record.listing_state, ListingState::Active);
    assert!(!record.pending_push);
    assert_eq!(record.payload["variants"][0]["sku"], "SKU-7-1");
}

#[tokio::test]
async fn disabled_listing_is_stored_as_draft_and_still_found() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, false, &[]);

    store
        .import(
            &product,
            &listing_for(7, 10, 5, ListingState::Disabled),
            &channel,
            ImportOptions::from_remote(),
        )
        .await
        .unwrap();

    let record = store.record(product.id, 1).unwrap().unwrap();
    assert_eq!(record.status, ProductStatus::Draft);
    assert_eq!(
        store.listing_id(product.id, &channel).await.unwrap(),
        Some(ListingId(5))
    );
}

#[tokio::test]
async fn local_record_without_listing_reads_as_missing() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, true, &[]);

    store.save_local_product(&product, &channel).unwrap();

    assert!(store.record(product.id, 1).unwrap().is_some());
    assert_eq!(store.listing_id(product.id, &channel).await.unwrap(), None);
}

#[tokio::test]
async fn import_without_suppression_queues_push() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, true, &[]);

    store
        .import(
            &product,
            &listing_for(7, 10, 1, ListingState::Active),
            &channel,
            ImportOptions::default(),
        )
        .await
        .unwrap();

    let pending = store.pending_pushes().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].product_id, product.id);
}

#[tokio::test]
async fn suppressed_import_clears_pending_push() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, true, &[]);

    store.save_local_product(&product, &channel).unwrap();
    assert_eq!(store.pending_pushes().unwrap().len(), 1);

    store
        .import(
            &product,
            &listing_for(7, 10, 1, ListingState::Active),
            &channel,
            ImportOptions::from_remote(),
        )
        .await
        .unwrap();

    assert!(store.pending_pushes().unwrap().is_empty());
}

#[tokio::test]
async fn import_rejects_listing_of_another_product() {
    let store = create_store();
    let channel = Channel::new(1, "Storefront", Some(10));
    store.upsert_channel(&channel, true).unwrap();
    let product = sample_product(7, true, &[]);

    let result = store
        .import(
            &product,
            &listing_for(8, 10, 1, ListingState::Active),
            &channel,
            ImportOptions::from_remote(),
        )
        .await;

    assert!(matches!(
        result,
        Err(ImportError::Mismatch {
            listing: 1,
            listing_product: 8,
            product: 7
        })
    ));
    assert!(store.record(product.id, 1).unwrap().is_none());
}

#[tokio::test]
async fn open_on_disk_persists_channels() {
    let dir = std::env::temp_dir().join(format!("catalog-sync-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("catalog.db");
    let _ = std::fs::remove_file(&path);

    {
        let store = CatalogStore::open(&path).unwrap();
        store.upsert_channel(&Channel::new(1, "Storefront", Some(10)), true).unwrap();
    }

    let reopened = CatalogStore::open(&path).unwrap();
    assert_eq!(reopened.active_channels().await.unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}
