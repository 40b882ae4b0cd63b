//! All things related to the storage of short links
//!
//! The [`Store`](Store) reads the whole collection from its backend, mutates it in memory and
//! writes the whole collection back. A single lock serializes those cycles within the process,
//! processes sharing one file or Redis key are not coordinated and the last writer wins.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use crate::codes;
use crate::config::StoreConfig;
use crate::links::ShortLink;

pub use backend::Backend;
pub use json_file::JsonFile;
pub use memory::Memory;
pub use redis_key::RedisKey;

pub mod backend;
mod json_file;
mod memory;
mod redis_key;

/// Number of candidate codes tried before giving up
pub const MAX_ATTEMPTS: usize = 10;

/// Store errors
#[derive(Debug, Error)]
pub enum Error {
    /// The input can not be used
    #[error("{0}")]
    InvalidInput(String),

    /// No record matches
    #[error("Short link not found")]
    NotFound,

    /// No record matches, but the backend could not be read either
    #[error("Short link not found, storage could not be read")]
    Degraded,

    /// Every candidate code was already taken
    #[error("Failed to generate unique short code after {attempts} attempts")]
    GenerationExhausted {
        /// Number of candidates tried
        attempts: usize,
    },

    /// The backend could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] backend::Error),
}

/// Result type for all store operations
pub type Result<T> = core::result::Result<T, Error>;

/// A single page of links
#[derive(Debug, PartialEq, Eq)]
pub struct Page {
    /// Links on this page, newest first
    pub links: Vec<ShortLink>,

    /// Number of links matching the filter
    pub total: usize,

    /// Number of pages of this size
    pub total_pages: usize,

    /// The backend could not be read, the page is empty because of it
    pub degraded: bool,
}

/// The link store
#[derive(Clone)]
pub struct Store {
    /// Where the collection lives
    backend: Arc<dyn Backend>,

    /// Serializes every read-modify-write cycle
    lock: Arc<Mutex<()>>,

    /// Length of generated codes
    code_length: usize,
}

impl Store {
    /// Create a store on top of a backend
    pub fn new(backend: Arc<dyn Backend>, code_length: usize) -> Self {
        Self {
            backend,
            lock: Arc::new(Mutex::new(())),
            code_length,
        }
    }

    /// Create a store with the configured backend
    ///
    /// # Errors
    ///
    /// Will return `Err` when the backend can not be set up, e.g. an invalid Redis URL
    pub fn from_config(config: &StoreConfig, code_length: usize) -> backend::Result<Self> {
        let backend: Arc<dyn Backend> = match config {
            StoreConfig::File { path } => Arc::new(JsonFile::new(path.clone())),
            StoreConfig::Redis { url, key } => Arc::new(RedisKey::new(url, key.clone())?),
            StoreConfig::Memory => Arc::new(Memory::new()),
        };

        tracing::info!("Using {} store", backend.name());

        Ok(Self::new(backend, code_length))
    }

    /// Read the collection, falling back to an empty one
    ///
    /// The second value tells whether the fallback was used
    async fn read_or_empty(&self) -> (Vec<ShortLink>, bool) {
        match self.backend.read_all().await {
            Ok(links) => (links, false),
            Err(err) => {
                tracing::warn!(
                    "Could not read from {} store, treating it as empty: {err}",
                    self.backend.name()
                );

                (Vec::new(), true)
            }
        }
    }

    /// Create a short link for `url` with a fresh code
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `url` is not an absolute URL
    /// - `GenerationExhausted` when no free code was found in [`MAX_ATTEMPTS`](MAX_ATTEMPTS)
    /// - `StorageUnavailable` when the backend can not be read or written
    pub async fn create(&self, url: &str, owner_id: Option<&str>) -> Result<ShortLink> {
        Url::parse(url).map_err(|err| Error::InvalidInput(format!("Invalid URL: {err}")))?;

        let _guard = self.lock.lock().await;

        // an unreadable collection is never written back, that would wipe it
        let mut links = self.backend.read_all().await?;

        let short_code = (0..MAX_ATTEMPTS)
            .map(|_| codes::generate(self.code_length))
            .find(|candidate| !links.iter().any(|link| link.has_code(candidate)))
            .ok_or(Error::GenerationExhausted {
                attempts: MAX_ATTEMPTS,
            })?;

        let link = ShortLink {
            id: Uuid::new_v4(),
            short_code,
            original_url: url.to_string(),
            created_at: Utc::now(),
            owner_id: owner_id.map(ToString::to_string),
            click_count: 0,
        };

        links.push(link.clone());
        self.backend.write_all(&links).await?;

        tracing::debug!(r#"Created "{}" for {}"#, link.short_code, link.original_url);

        Ok(link)
    }

    /// Find a link by code, ignoring case, and count the click
    ///
    /// A failure to save the new count is logged, the link is still returned
    ///
    /// # Errors
    ///
    /// Will return `NotFound` for blank or unknown codes and `Degraded` when the backend can
    /// not be read
    pub async fn resolve(&self, code: &str) -> Result<ShortLink> {
        let code = code.trim();

        if code.is_empty() {
            return Err(Error::NotFound);
        }

        let _guard = self.lock.lock().await;

        let (mut links, degraded) = self.read_or_empty().await;

        let Some(link) = links.iter_mut().find(|link| link.has_code(code)) else {
            return Err(if degraded {
                Error::Degraded
            } else {
                Error::NotFound
            });
        };

        link.click_count += 1;
        let link = link.clone();

        if let Err(err) = self.backend.write_all(&links).await {
            tracing::warn!(
                r#"Could not save click on "{}" to {} store: {err}"#,
                link.short_code,
                self.backend.name()
            );
        }

        Ok(link)
    }

    /// List links, newest first, a page at a time
    ///
    /// `page` starts at 1, page 0 or a page past the end is empty
    pub async fn list(&self, page: usize, page_size: usize, owner_id: Option<&str>) -> Page {
        let (mut links, degraded) = {
            let _guard = self.lock.lock().await;

            self.read_or_empty().await
        };

        if let Some(owner_id) = owner_id {
            links.retain(|link| link.is_owned_by(owner_id));
        }

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = links.len();
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };

        let links = if page == 0 {
            Vec::new()
        } else {
            let start = (page - 1).saturating_mul(page_size);

            links.into_iter().skip(start).take(page_size).collect()
        };

        Page {
            links,
            total,
            total_pages,
            degraded,
        }
    }

    /// Delete a link by ID
    ///
    /// With an `owner_id`, only links of that owner can be deleted
    ///
    /// # Errors
    ///
    /// Will return `StorageUnavailable` when the backend can not be read or written
    pub async fn delete(&self, id: &Uuid, owner_id: Option<&str>) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut links = self.backend.read_all().await?;

        let Some(index) = links.iter().position(|link| &link.id == id) else {
            return Ok(false);
        };

        if let Some(owner_id) = owner_id
            && !links[index].is_owned_by(owner_id)
        {
            return Ok(false);
        }

        let link = links.remove(index);
        self.backend.write_all(&links).await?;

        tracing::debug!(r#"Deleted "{}""#, link.short_code);

        Ok(true)
    }
}
