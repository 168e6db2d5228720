use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::{
    ApiError, CatalogClient, Channel, ChannelRegistry, ImportError, ImportOptions, Listing,
    ListingId, ListingIndex, LookupError, NewListing, Product, ProductId, ProductImporter,
    ProductInclude, RegistryError, Reporter, SyncError, SyncServices, Variant, VariantListing,
};

/// Build a product with the given `(variant id, purchasing disabled)` pairs.
pub fn sample_product(id: u64, is_visible: bool, variants: &[(u64, bool)]) -> Product {
    let id = ProductId::new(id).expect("sample product ids are positive");
    Product {
        id,
        name: format!("Product {id}"),
        is_visible,
        variants: variants
            .iter()
            .map(|(variant_id, purchasing_disabled)| Variant {
                id: *variant_id,
                product_id: id,
                sku: Some(format!("SKU-{id}-{variant_id}")),
                purchasing_disabled: *purchasing_disabled,
            })
            .collect(),
        attributes: serde_json::Map::new(),
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        message: format!("{what} not found"),
        body: format!(r#"{{"status":404,"title":"{what} not found"}}"#),
        headers: vec![("content-type".into(), "application/json".into())],
    }
}

#[derive(Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    listings: HashMap<(u64, ListingId), Listing>,
    assigned_ids: HashMap<u64, ListingId>,
    failing_creates: HashSet<u64>,
    created: Vec<(u64, NewListing)>,
    calls: usize,
    next_listing_id: u64,
}

/// In-memory remote catalog. Unknown products and listings answer 404.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, product: Product) {
        let mut state = self.state.lock().unwrap();
        state.products.insert(product.id, product);
    }

    /// Register an existing listing on a remote channel.
    pub fn add_listing(&self, channel_id: u64, product_id: ProductId, listing_id: ListingId) {
        let mut state = self.state.lock().unwrap();
        state.listings.insert(
            (channel_id, listing_id),
            Listing {
                listing_id,
                channel_id,
                product_id,
                state: crate::ListingState::Active,
                name: None,
                variants: vec![],
            },
        );
    }

    /// Listings created on `channel_id` get this id instead of a generated one.
    pub fn assign_listing_id(&self, channel_id: u64, listing_id: ListingId) {
        let mut state = self.state.lock().unwrap();
        state.assigned_ids.insert(channel_id, listing_id);
    }

    /// Make listing creation on `channel_id` answer 422.
    pub fn fail_create(&self, channel_id: u64) {
        let mut state = self.state.lock().unwrap();
        state.failing_creates.insert(channel_id);
    }

    /// Total number of remote calls made.
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Every listing creation request received, with its remote channel id.
    pub fn created_requests(&self) -> Vec<(u64, NewListing)> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait::async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn product(
        &self,
        id: ProductId,
        _include: &[ProductInclude],
    ) -> Result<Product, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("product"))
    }

    async fn create_listings(
        &self,
        channel_id: u64,
        listings: &[NewListing],
    ) -> Result<Vec<Listing>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        for listing in listings {
            state.created.push((channel_id, listing.clone()));
        }

        if state.failing_creates.contains(&channel_id) {
            return Err(ApiError::Http {
                status: 422,
                message: "listing rejected".into(),
                body: r#"{"status":422,"title":"listing rejected"}"#.into(),
                headers: vec![],
            });
        }

        let mut created = Vec::with_capacity(listings.len());
        for request in listings {
            let assigned = state.assigned_ids.get(&channel_id).copied();
            let listing_id = match assigned {
                Some(id) => id,
                None => {
                    state.next_listing_id += 1;
                    ListingId(1000 + state.next_listing_id)
                }
            };
            let listing = Listing {
                listing_id,
                channel_id,
                product_id: request.product_id,
                state: request.state,
                name: None,
                variants: request
                    .variants
                    .iter()
                    .map(|v| VariantListing {
                        product_id: v.product_id,
                        variant_id: v.variant_id,
                        state: v.state,
                    })
                    .collect(),
            };
            state.listings.insert((channel_id, listing_id), listing.clone());
            created.push(listing);
        }
        Ok(created)
    }

    async fn listing(&self, channel_id: u64, listing_id: ListingId) -> Result<Listing, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .listings
            .get(&(channel_id, listing_id))
            .cloned()
            .ok_or_else(|| not_found("listing"))
    }
}

/// Fixed set of active channels.
pub struct InMemoryChannels {
    channels: Vec<Channel>,
    failing: bool,
}

impl InMemoryChannels {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            channels,
            failing: false,
        }
    }

    /// A registry whose lookups always fail.
    pub fn failing() -> Self {
        Self {
            channels: vec![],
            failing: true,
        }
    }
}

#[async_trait::async_trait]
impl ChannelRegistry for InMemoryChannels {
    async fn active_channels(&self) -> Result<Vec<Channel>, RegistryError> {
        if self.failing {
            return Err(RegistryError::Storage("registry unavailable".into()));
        }
        Ok(self.channels.clone())
    }
}

/// Local listing records keyed by (product, local channel id).
#[derive(Default)]
pub struct InMemoryListingIndex {
    entries: Mutex<HashMap<(ProductId, u64), Option<ListingId>>>,
}

impl InMemoryListingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, product_id: ProductId, channel: &Channel, listing_id: Option<ListingId>) {
        self.entries
            .lock()
            .unwrap()
            .insert((product_id, channel.id), listing_id);
    }
}

#[async_trait::async_trait]
impl ListingIndex for InMemoryListingIndex {
    async fn listing_id(
        &self,
        product_id: ProductId,
        channel: &Channel,
    ) -> Result<Option<ListingId>, LookupError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(&(product_id, channel.id))
            .copied()
            .flatten()
            .filter(|id| id.0 > 0))
    }
}

/// One importer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCall {
    pub product_id: ProductId,
    pub listing_id: ListingId,
    pub channel_id: u64,
    pub options: ImportOptions,
}

/// Importer that records every call. Calls for failing channels are still
/// recorded before the error is returned.
#[derive(Default)]
pub struct RecordingImporter {
    calls: Mutex<Vec<ImportCall>>,
    failing: Mutex<HashSet<u64>>,
}

impl RecordingImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_channel(&self, channel_id: u64) {
        self.failing.lock().unwrap().insert(channel_id);
    }

    pub fn calls(&self) -> Vec<ImportCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProductImporter for RecordingImporter {
    async fn import(
        &self,
        product: &Product,
        listing: &Listing,
        channel: &Channel,
        options: ImportOptions,
    ) -> Result<(), ImportError> {
        self.calls.lock().unwrap().push(ImportCall {
            product_id: product.id,
            listing_id: listing.listing_id,
            channel_id: channel.id,
            options,
        });

        if self.failing.lock().unwrap().contains(&channel.id) {
            return Err(ImportError::Storage("disk full".into()));
        }
        Ok(())
    }
}

/// A reporter event, flattened for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Reported {
    Error {
        message: String,
        channel_id: Option<u64>,
        response: Option<String>,
    },
    Skip {
        product_id: ProductId,
        channel_id: u64,
        message: String,
    },
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Reported>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Reported> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report_error(&self, error: &SyncError) {
        self.events.lock().unwrap().push(Reported::Error {
            message: error.to_string(),
            channel_id: error.channel().map(|c| c.id),
            response: error
                .api_error()
                .and_then(|e| e.response_body())
                .map(str::to_owned),
        });
    }

    fn report_skip(&self, product_id: ProductId, channel: &Channel, message: &str) {
        self.events.lock().unwrap().push(Reported::Skip {
            product_id,
            channel_id: channel.id,
            message: message.to_owned(),
        });
    }
}

/// All in-memory collaborators wired together.
pub struct Harness {
    pub catalog: Arc<InMemoryCatalog>,
    pub channels: Arc<InMemoryChannels>,
    pub listings: Arc<InMemoryListingIndex>,
    pub importer: Arc<RecordingImporter>,
    pub reporter: Arc<RecordingReporter>,
}

impl Harness {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self::with_registry(InMemoryChannels::new(channels))
    }

    pub fn with_registry(channels: InMemoryChannels) -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalog::new()),
            channels: Arc::new(channels),
            listings: Arc::new(InMemoryListingIndex::new()),
            importer: Arc::new(RecordingImporter::new()),
            reporter: Arc::new(RecordingReporter::new()),
        }
    }

    pub fn services(&self) -> SyncServices {
        SyncServices {
            catalog: self.catalog.clone(),
            channels: self.channels.clone(),
            listings: self.listings.clone(),
            importer: self.importer.clone(),
            reporter: self.reporter.clone(),
        }
    }
}
