use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::product::{Product, ProductId, Variant};

/// Remote identifier of a product/channel listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication state of a listing or one of its variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    Active,
    Disabled,
    /// Any transitional state the remote reports (pending, queued, ...).
    #[serde(other)]
    Other,
}

impl ListingState {
    /// State of a whole listing, driven by product visibility only.
    pub fn for_product(product: &Product) -> Self {
        if product.is_visible {
            Self::Active
        } else {
            Self::Disabled
        }
    }

    pub fn for_variant(variant: &Variant) -> Self {
        if variant.purchasing_disabled {
            Self::Disabled
        } else {
            Self::Active
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "disabled" => Self::Disabled,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-variant entry of a listing as the remote reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantListing {
    pub product_id: ProductId,
    pub variant_id: u64,
    pub state: ListingState,
}

/// The association of one product with one channel on the remote system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub listing_id: ListingId,
    pub channel_id: u64,
    pub product_id: ProductId,
    pub state: ListingState,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantListing>,
}

/// Variant entry of a listing creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVariantListing {
    pub product_id: ProductId,
    pub variant_id: u64,
    pub state: ListingState,
}

/// Body of a listing creation request for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewListing {
    pub product_id: ProductId,
    pub state: ListingState,
    pub variants: Vec<NewVariantListing>,
}

impl NewListing {
    /// One variant entry per product variant; states follow visibility and
    /// purchasability.
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            state: ListingState::for_product(product),
            variants: product
                .variants
                .iter()
                .map(|variant| NewVariantListing {
                    product_id: product.id,
                    variant_id: variant.id,
                    state: ListingState::for_variant(variant),
                })
                .collect(),
        }
    }
}

/// Errors raised by a local listing lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Maps (product, channel) to the listing id recorded locally, without
/// contacting the remote system.
#[async_trait::async_trait]
pub trait ListingIndex: Send + Sync {
    /// Looks across every local status. `Ok(None)` when there is no record,
    /// or the record carries no listing id.
    async fn listing_id(
        &self,
        product_id: ProductId,
        channel: &Channel,
    ) -> Result<Option<ListingId>, LookupError>;
}

#[async_trait::async_trait]
impl<T: ListingIndex + ?Sized> ListingIndex for Arc<T> {
    async fn listing_id(
        &self,
        product_id: ProductId,
        channel: &Channel,
    ) -> Result<Option<ListingId>, LookupError> {
        (**self).listing_id(product_id, channel).await
    }
}
