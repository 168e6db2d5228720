use std::fmt;
use std::sync::Arc;

/// A sales channel the catalog can be listed on.
///
/// `id` is the local identifier; `remote_id` is the channel id on the remote
/// platform. A channel without a remote id is inert: sync skips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: u64,
    pub name: String,
    pub remote_id: Option<u64>,
}

impl Channel {
    pub fn new(id: u64, name: impl Into<String>, remote_id: Option<u64>) -> Self {
        Self {
            id,
            name: name.into(),
            remote_id,
        }
    }

    /// The remote channel id, if this channel is connected.
    pub fn connected_remote_id(&self) -> Option<u64> {
        self.remote_id.filter(|id| *id > 0)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Errors raised while resolving channels.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Resolves the set of channels products should be listed on.
#[async_trait::async_trait]
pub trait ChannelRegistry: Send + Sync {
    async fn active_channels(&self) -> Result<Vec<Channel>, RegistryError>;
}

#[async_trait::async_trait]
impl<T: ChannelRegistry + ?Sized> ChannelRegistry for Arc<T> {
    async fn active_channels(&self) -> Result<Vec<Channel>, RegistryError> {
        (**self).active_channels().await
    }
}
