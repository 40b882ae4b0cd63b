//! Redis backend
//!
//! The collection lives as one JSON string under a single key

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::sync::RwLock;

use crate::links::ShortLink;

use super::backend::Backend;
use super::backend::Result;

/// Redis backed collection
pub struct RedisKey {
    /// Client to open connections with
    client: redis::Client,

    /// Cached connection, `None` until first use or after an error
    connection: RwLock<Option<MultiplexedConnection>>,

    /// Key holding the collection
    key: String,
}

impl RedisKey {
    /// Prepare a client, no connection is made until the first command
    ///
    /// # Errors
    ///
    /// Will return `Err` when `url` is not a valid Redis URL
    pub fn new<K>(url: &str, key: K) -> Result<Self>
    where
        K: Into<String>,
    {
        Ok(Self {
            client: redis::Client::open(url)?,
            connection: RwLock::new(None),
            key: key.into(),
        })
    }

    /// Get the cached connection or open a new one
    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(connection) = self.connection.read().await.as_ref() {
            return Ok(connection.clone());
        }

        let mut guard = self.connection.write().await;

        // someone else might have connected while waiting for the lock
        if let Some(connection) = guard.as_ref() {
            return Ok(connection.clone());
        }

        let connection = self.client.get_multiplexed_async_connection().await?;
        tracing::debug!("Redis connection established");

        *guard = Some(connection.clone());

        Ok(connection)
    }

    /// Drop the cached connection so the next command reconnects
    async fn reset_connection(&self) {
        *self.connection.write().await = None;
    }

    /// Run a command, resetting the connection when it fails
    async fn query<T>(&self, command: &redis::Cmd) -> Result<T>
    where
        T: redis::FromRedisValue,
    {
        let mut connection = self.connection().await?;

        match command.query_async::<T>(&mut connection).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.reset_connection().await;

                Err(err.into())
            }
        }
    }
}

/// Turn the value under the key into links, an absent key has none
fn decode(contents: Option<String>) -> Result<Vec<ShortLink>> {
    match contents {
        Some(contents) => Ok(serde_json::from_str(&contents)?),
        None => Ok(Vec::new()),
    }
}

/// Turn links into the value stored under the key
fn encode(links: &[ShortLink]) -> Result<String> {
    Ok(serde_json::to_string(links)?)
}

#[async_trait]
impl Backend for RedisKey {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn read_all(&self) -> Result<Vec<ShortLink>> {
        let mut command = redis::cmd("GET");
        command.arg(&self.key);

        decode(self.query::<Option<String>>(&command).await?)
    }

    async fn write_all(&self, links: &[ShortLink]) -> Result<()> {
        let contents = encode(links)?;

        let mut command = redis::cmd("SET");
        command.arg(&self.key).arg(contents);

        self.query::<()>(&command).await
    }
}
