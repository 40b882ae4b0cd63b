//! Memory backend
//!
//! Will be destroyed on system shutdown

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::links::ShortLink;

use super::backend::Backend;
use super::backend::Result;

/// An in-memory collection
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All links in storage
    links: Arc<Mutex<Vec<ShortLink>>>,
}

impl Memory {
    /// Create a new empty Memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for Memory {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read_all(&self) -> Result<Vec<ShortLink>> {
        Ok(self.links.lock().await.clone())
    }

    async fn write_all(&self, links: &[ShortLink]) -> Result<()> {
        *self.links.lock().await = links.to_vec();

        Ok(())
    }
}
