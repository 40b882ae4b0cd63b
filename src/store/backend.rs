//! Backends holding the whole link collection

use async_trait::async_trait;
use thiserror::Error;

use crate::links::ShortLink;

/// Backend errors
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored collection is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Talking to Redis failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for all backend interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage capability shared by all backends
///
/// There is no per-record access, every mutation rewrites the full collection
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Read the full collection
    ///
    /// An absent collection is an empty one
    async fn read_all(&self) -> Result<Vec<ShortLink>>;

    /// Replace the full collection
    async fn write_all(&self, links: &[ShortLink]) -> Result<()>;
}
