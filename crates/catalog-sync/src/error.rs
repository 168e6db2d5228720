use crate::catalog::ApiError;
use crate::channel::{Channel, RegistryError};
use crate::importer::ImportError;
use crate::listing::{ListingId, LookupError};
use crate::product::ProductId;

/// Failures a sync run reports. None of these escape the coordinators; they
/// are handed to a [`Reporter`](crate::Reporter) instead.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no channels are connected")]
    NoChannelsConnected,

    #[error("could not resolve active channels: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to fetch product {product_id}: {source}")]
    FetchProduct {
        product_id: ProductId,
        #[source]
        source: ApiError,
    },

    #[error("failed to create listing for product {product_id} on channel {channel}: {source}")]
    CreateListing {
        product_id: ProductId,
        channel: Channel,
        #[source]
        source: ApiError,
    },

    #[error(
        "failed to fetch listing {listing_id} for product {product_id} on channel {channel}: {source}"
    )]
    FetchListing {
        product_id: ProductId,
        channel: Channel,
        listing_id: ListingId,
        #[source]
        source: ApiError,
    },

    #[error("failed to look up listing for product {product_id} on channel {channel}: {source}")]
    Lookup {
        product_id: ProductId,
        channel: Channel,
        #[source]
        source: LookupError,
    },

    #[error("failed to import product {product_id} on channel {channel}: {source}")]
    Import {
        product_id: ProductId,
        channel: Channel,
        #[source]
        source: ImportError,
    },
}

impl SyncError {
    /// The remote API error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::FetchProduct { source, .. }
            | Self::CreateListing { source, .. }
            | Self::FetchListing { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The channel this failure is scoped to. `None` for run-level failures.
    pub fn channel(&self) -> Option<&Channel> {
        match self {
            Self::CreateListing { channel, .. }
            | Self::FetchListing { channel, .. }
            | Self::Lookup { channel, .. }
            | Self::Import { channel, .. } => Some(channel),
            _ => None,
        }
    }

    /// Whether this failure ended the whole run rather than one channel.
    pub fn is_fatal(&self) -> bool {
        self.channel().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error() -> ApiError {
        ApiError::Http {
            status: 422,
            message: "Unprocessable".into(),
            body: r#"{"title":"Unprocessable"}"#.into(),
            headers: vec![("x-request-id".into(), "abc".into())],
        }
    }

    #[test]
    fn fetch_failure_is_fatal_and_carries_response() {
        let err = SyncError::FetchProduct {
            product_id: ProductId::new(42).unwrap(),
            source: http_error(),
        };

        assert!(err.is_fatal());
        let api = err.api_error().unwrap();
        assert_eq!(api.status(), Some(422));
        assert_eq!(api.response_body(), Some(r#"{"title":"Unprocessable"}"#));
        assert_eq!(api.response_headers().len(), 1);
        assert_eq!(
            err.to_string(),
            "failed to fetch product 42: HTTP 422: Unprocessable"
        );
    }

    #[test]
    fn channel_failures_are_not_fatal() {
        let err = SyncError::CreateListing {
            product_id: ProductId::new(42).unwrap(),
            channel: Channel::new(1, "A", Some(10)),
            source: ApiError::Network("connection reset".into()),
        };

        assert!(!err.is_fatal());
        assert_eq!(err.channel().map(|c| c.id), Some(1));
        assert!(err.api_error().unwrap().response_body().is_none());
    }

    #[test]
    fn no_channels_has_no_api_context() {
        assert!(SyncError::NoChannelsConnected.api_error().is_none());
        assert!(SyncError::NoChannelsConnected.is_fatal());
    }
}
