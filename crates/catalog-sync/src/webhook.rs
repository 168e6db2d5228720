use serde::Deserialize;

use crate::product::ProductId;
use crate::report::SyncReport;
use crate::sync::{ProductCreator, ProductUpdater, SyncServices};

/// Errors raised while interpreting a webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook payload: {0}")]
    Parse(String),

    #[error("unsupported webhook scope: {0}")]
    UnsupportedScope(String),

    #[error("webhook carries invalid product id {0}")]
    InvalidProductId(u64),
}

/// Body of a webhook delivery from the remote platform.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub scope: String,
    #[serde(default)]
    pub store_id: Option<String>,
    pub data: WebhookData,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub producer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
}

impl WebhookPayload {
    pub fn parse(body: &str) -> Result<Self, WebhookError> {
        serde_json::from_str(body).map_err(|e| WebhookError::Parse(e.to_string()))
    }

    /// Map the delivery onto the product event it announces.
    pub fn product_event(&self) -> Result<ProductEvent, WebhookError> {
        let product_id =
            ProductId::new(self.data.id).ok_or(WebhookError::InvalidProductId(self.data.id))?;

        match self.scope.as_str() {
            "store/product/created" => Ok(ProductEvent::Created(product_id)),
            "store/product/updated" => Ok(ProductEvent::Updated(product_id)),
            "store/product/inventory/updated" | "store/product/inventory/order/updated" => {
                Ok(ProductEvent::InventoryUpdated(product_id))
            }
            other => Err(WebhookError::UnsupportedScope(other.to_owned())),
        }
    }
}

/// A product change announced by the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEvent {
    Created(ProductId),
    Updated(ProductId),
    InventoryUpdated(ProductId),
}

impl ProductEvent {
    pub fn product_id(self) -> ProductId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::InventoryUpdated(id) => id,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Created(_) => "product_created",
            Self::Updated(_) => "product_updated",
            Self::InventoryUpdated(_) => "product_inventory_updated",
        }
    }
}

/// Routes product events to the matching sync path.
pub struct WebhookDispatcher {
    creator: ProductCreator,
    updater: ProductUpdater,
}

impl WebhookDispatcher {
    pub fn new(services: SyncServices) -> Self {
        Self {
            creator: ProductCreator::new(services.clone()),
            updater: ProductUpdater::new(services),
        }
    }

    pub async fn dispatch(&self, event: ProductEvent) -> SyncReport {
        let product_id = event.product_id();
        tracing::info!(%product_id, event = event.name(), "product webhook received");

        match event {
            ProductEvent::Created(id) => self.creator.run(id).await,
            ProductEvent::Updated(id) | ProductEvent::InventoryUpdated(id) => {
                self.updater.run(id).await
            }
        }
    }

    /// Parse a raw delivery body and dispatch it.
    pub async fn handle(&self, body: &str) -> Result<SyncReport, WebhookError> {
        let event = WebhookPayload::parse(body)?.product_event()?;
        Ok(self.dispatch(event).await)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{Harness, sample_product};
    use crate::{Channel, ListingId};

    use super::*;

    fn body(scope: &str, id: u64) -> String {
        format!(
            r#"{{
                "scope": "{scope}",
                "store_id": "1025646",
                "data": {{"type": "product", "id": {id}}},
                "hash": "352e4afc6dd3fc85ea26bfdf3f91852604d57528",
                "created_at": 1561482670,
                "producer": "stores/abc123"
            }}"#
        )
    }

    #[test]
    fn scopes_map_to_events() {
        let id = ProductId::new(42).unwrap();
        let event = |scope| {
            WebhookPayload::parse(&body(scope, 42))
                .unwrap()
                .product_event()
                .unwrap()
        };

        assert_eq!(event("store/product/created"), ProductEvent::Created(id));
        assert_eq!(event("store/product/updated"), ProductEvent::Updated(id));
        assert_eq!(
            event("store/product/inventory/updated"),
            ProductEvent::InventoryUpdated(id)
        );
        assert_eq!(
            event("store/product/inventory/order/updated"),
            ProductEvent::InventoryUpdated(id)
        );
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let payload = WebhookPayload::parse(&body("store/order/created", 1)).unwrap();
        assert!(matches!(
            payload.product_event(),
            Err(WebhookError::UnsupportedScope(scope)) if scope == "store/order/created"
        ));
    }

    #[test]
    fn zero_product_id_is_rejected() {
        let payload = WebhookPayload::parse(&body("store/product/updated", 0)).unwrap();
        assert!(matches!(
            payload.product_event(),
            Err(WebhookError::InvalidProductId(0))
        ));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(
            WebhookPayload::parse("{\"scope\": 1}"),
            Err(WebhookError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn created_event_runs_creation_path() {
        let harness = Harness::new(vec![Channel::new(1, "A", Some(10))]);
        harness.catalog.add_product(sample_product(42, true, &[]));
        let dispatcher = WebhookDispatcher::new(harness.services());

        let report = dispatcher
            .handle(&body("store/product/created", 42))
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(harness.catalog.created_requests().len(), 1);
    }

    #[tokio::test]
    async fn inventory_event_runs_update_path() {
        let channel = Channel::new(1, "A", Some(10));
        let harness = Harness::new(vec![channel.clone()]);
        let product_id = ProductId::new(42).unwrap();
        harness.catalog.add_product(sample_product(42, true, &[]));
        harness.catalog.add_listing(10, product_id, ListingId(5));
        harness.listings.record(product_id, &channel, Some(ListingId(5)));
        let dispatcher = WebhookDispatcher::new(harness.services());

        let report = dispatcher
            .dispatch(ProductEvent::InventoryUpdated(product_id))
            .await;

        assert_eq!(report.imported, 1);
        assert!(harness.catalog.created_requests().is_empty());
        assert_eq!(harness.importer.calls()[0].listing_id, ListingId(5));
    }
}
