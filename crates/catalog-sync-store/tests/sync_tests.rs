use std::sync::Arc;

use catalog_sync::test_support::{InMemoryCatalog, RecordingReporter, Reported, sample_product};
use catalog_sync::{
    Channel, ImportOptions, Listing, ListingId, ListingIndex, ListingState, ProductCreator,
    ProductId, ProductImporter, ProductUpdater, SyncServices,
};
use catalog_sync_store::CatalogStore;

struct Fixture {
    store: Arc<CatalogStore>,
    catalog: Arc<InMemoryCatalog>,
    reporter: Arc<RecordingReporter>,
}

impl Fixture {
    fn new(channels: &[(Channel, bool)]) -> Self {
        let store = CatalogStore::open_in_memory().unwrap();
        for (channel, active) in channels {
            store.upsert_channel(channel, *active).unwrap();
        }

        Self {
            store: Arc::new(store),
            catalog: Arc::new(InMemoryCatalog::new()),
            reporter: Arc::new(RecordingReporter::new()),
        }
    }

    fn services(&self) -> SyncServices {
        SyncServices {
            catalog: self.catalog.clone(),
            channels: self.store.clone(),
            listings: self.store.clone(),
            importer: self.store.clone(),
            reporter: self.reporter.clone(),
        }
    }
}

fn id(n: u64) -> ProductId {
    ProductId::new(n).unwrap()
}

#[tokio::test]
async fn create_then_update_round_trips_through_store() {
    let storefront = Channel::new(1, "Storefront", Some(10));
    let fixture = Fixture::new(&[
        (storefront.clone(), true),
        (Channel::new(2, "Unconnected", None), true),
    ]);
    fixture.catalog.add_product(sample_product(42, true, &[(1, false)]));
    fixture.catalog.assign_listing_id(10, ListingId(555));

    let created = ProductCreator::new(fixture.services()).run(id(42)).await;
    assert_eq!(created.imported, 1);
    assert_eq!(created.skipped, 1);

    assert_eq!(
        fixture.store.listing_id(id(42), &storefront).await.unwrap(),
        Some(ListingId(555))
    );
    assert!(fixture.store.record(id(42), 2).unwrap().is_none());

    // The product is hidden remotely, then the update webhook arrives.
    fixture.catalog.add_product(sample_product(42, false, &[(1, false)]));

    let updated = ProductUpdater::new(fixture.services()).run(id(42)).await;
    assert_eq!(updated.imported, 1);

    let record = fixture.store.record(id(42), 1).unwrap().unwrap();
    assert!(!record.is_visible);
    assert_eq!(record.listing_id, Some(ListingId(555)));
    assert!(!record.pending_push);
    assert!(fixture.reporter.events().is_empty());
}

#[tokio::test]
async fn update_skips_channels_without_local_listing() {
    let mapped = Channel::new(1, "Storefront", Some(10));
    let unmapped = Channel::new(2, "Marketplace", Some(20));
    let fixture = Fixture::new(&[(mapped.clone(), true), (unmapped, true)]);
    fixture.catalog.add_product(sample_product(7, true, &[]));
    fixture.catalog.add_listing(10, id(7), ListingId(999));
    fixture
        .store
        .import(
            &sample_product(7, true, &[]),
            &Listing {
                listing_id: ListingId(999),
                channel_id: 10,
                product_id: id(7),
                state: ListingState::Active,
                name: None,
                variants: vec![],
            },
            &mapped,
            ImportOptions::from_remote(),
        )
        .await
        .unwrap();

    let report = ProductUpdater::new(fixture.services()).run(id(7)).await;

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
    assert!(fixture.store.record(id(7), 2).unwrap().is_none());
    assert!(matches!(
        &fixture.reporter.events()[..],
        [Reported::Skip { channel_id: 2, .. }]
    ));
}

#[tokio::test]
async fn disabled_channels_do_not_count_as_connected() {
    let fixture = Fixture::new(&[(Channel::new(1, "Storefront", Some(10)), false)]);
    fixture.catalog.add_product(sample_product(42, true, &[]));

    let report = ProductCreator::new(fixture.services()).run(id(42)).await;

    assert!(report.aborted);
    assert_eq!(fixture.catalog.call_count(), 0);
    assert!(matches!(
        &fixture.reporter.events()[..],
        [Reported::Error { message, .. }] if message == "no channels are connected"
    ));
}
