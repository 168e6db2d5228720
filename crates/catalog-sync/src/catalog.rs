use std::sync::Arc;

use crate::listing::{Listing, ListingId, NewListing};
use crate::product::{Product, ProductId, ProductInclude};

/// Errors returned by the remote catalog API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
        headers: Vec<(String, String)>,
    },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Raw response body, when the remote answered at all.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn response_headers(&self) -> &[(String, String)] {
        match self {
            Self::Http { headers, .. } => headers,
            _ => &[],
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The remote catalog and channel API.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a product with the requested sub-resources embedded.
    async fn product(
        &self,
        id: ProductId,
        include: &[ProductInclude],
    ) -> Result<Product, ApiError>;

    /// Create listings on a remote channel. Returns the listings the remote
    /// created, in request order.
    async fn create_listings(
        &self,
        channel_id: u64,
        listings: &[NewListing],
    ) -> Result<Vec<Listing>, ApiError>;

    /// Fetch one listing from a remote channel.
    async fn listing(&self, channel_id: u64, listing_id: ListingId) -> Result<Listing, ApiError>;
}

#[async_trait::async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    async fn product(
        &self,
        id: ProductId,
        include: &[ProductInclude],
    ) -> Result<Product, ApiError> {
        (**self).product(id, include).await
    }

    async fn create_listings(
        &self,
        channel_id: u64,
        listings: &[NewListing],
    ) -> Result<Vec<Listing>, ApiError> {
        (**self).create_listings(channel_id, listings).await
    }

    async fn listing(&self, channel_id: u64, listing_id: ListingId) -> Result<Listing, ApiError> {
        (**self).listing(channel_id, listing_id).await
    }
}
