use std::time::Duration;

use catalog_sync::{
    ApiError, CatalogClient, Listing, ListingId, NewListing, Product, ProductId, ProductInclude,
};
use serde::de::DeserializeOwned;

use crate::envelope::{DataEnvelope, ErrorBody};

const DEFAULT_API_BASE: &str = "https://api.bigcommerce.com";

/// Connection settings for one BigCommerce store.
#[derive(Debug, Clone)]
pub struct BigCommerceConfig {
    pub store_hash: String,
    pub access_token: String,
    pub api_base_url: Option<String>,
    pub timeout: Option<Duration>,
}

/// Catalog and channel client for the BigCommerce v3 REST API.
pub struct BigCommerceClient {
    config: BigCommerceConfig,
    client: reqwest::Client,
}

impl BigCommerceClient {
    /// Build a client. Fails when the HTTP client cannot be constructed with
    /// the configured timeout.
    pub fn new(config: BigCommerceConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/stores/{}/v3/{}",
            self.api_base(),
            self.config.store_hash,
            path
        )
    }

    fn with_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-Auth-Token", &self.config.access_token)
            .header("Accept", "application/json")
            .header("User-Agent", "catalog-sync")
    }

    /// Send a request and unwrap the `data` envelope of a 2xx response.
    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = self
            .with_headers(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_owned(),
                        value.to_str().unwrap_or_default().to_owned(),
                    )
                })
                .collect();
            let body = response.text().await.unwrap_or_default();
            let message = ErrorBody::title_of(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            });

            tracing::debug!(status = status.as_u16(), %message, "remote API error");

            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
                body,
                headers,
            });
        }

        let envelope: DataEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl CatalogClient for BigCommerceClient {
    async fn product(
        &self,
        id: ProductId,
        include: &[ProductInclude],
    ) -> Result<Product, ApiError> {
        let mut url = self.url(&format!("catalog/products/{id}"));
        if !include.is_empty() {
            let include: Vec<&str> = include.iter().map(|i| i.as_str()).collect();
            url.push_str("?include=");
            url.push_str(&include.join(","));
        }

        self.send(self.client.get(&url)).await
    }

    async fn create_listings(
        &self,
        channel_id: u64,
        listings: &[NewListing],
    ) -> Result<Vec<Listing>, ApiError> {
        let url = self.url(&format!("channels/{channel_id}/listings"));
        self.send(self.client.post(&url).json(listings)).await
    }

    async fn listing(&self, channel_id: u64, listing_id: ListingId) -> Result<Listing, ApiError> {
        let url = self.url(&format!("channels/{channel_id}/listings/{listing_id}"));
        self.send(self.client.get(&url)).await
    }
}
