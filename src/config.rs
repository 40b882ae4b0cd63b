//! Startup configuration
//!
//! Everything is read once from the environment and passed down explicitly

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use anyhow::bail;

use crate::codes::DEFAULT_LENGTH;
use crate::utils::env_var;
use crate::utils::env_var_or_else;

const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_DATA_FILE: &str = "data/short-links.json";
const DEFAULT_REDIS_KEY: &str = "shortlinks:all";

/// Which backend holds the link collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    /// A single JSON file on disk
    File {
        /// Location of the JSON file
        path: PathBuf,
    },

    /// A single key in Redis
    Redis {
        /// Connection URL, `redis://...`
        url: String,

        /// Key holding the serialized collection
        key: String,
    },

    /// Process memory, gone on shutdown
    Memory,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Selected backend
    pub store: StoreConfig,

    /// Length of generated short codes
    pub code_length: usize,

    /// Secret to verify caller tokens with
    pub jwt_secret: String,
}

impl Config {
    /// Detect the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` for unparsable values or an unknown `STORE_BACKEND`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            address: address_from_env()?,
            store: store_from_env()?,
            code_length: code_length_from_env()?,
            jwt_secret: env_var_or_else("JWT_SECRET", || {
                let jwt_secret = uuid::Uuid::new_v4().simple().to_string();
                tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
                jwt_secret
            }),
        })
    }
}

fn address_from_env() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}

fn store_from_env() -> Result<StoreConfig> {
    let redis_url = env_var("REDIS_URL");

    let backend = env_var("STORE_BACKEND").unwrap_or_else(|| {
        if redis_url.is_some() {
            String::from("redis")
        } else {
            String::from("file")
        }
    });

    parse_store(&backend, redis_url)
}

fn parse_store(backend: &str, redis_url: Option<String>) -> Result<StoreConfig> {
    match backend.to_ascii_lowercase().as_str() {
        "file" => Ok(StoreConfig::File {
            path: PathBuf::from(env_var_or_else("DATA_FILE", || {
                String::from(DEFAULT_DATA_FILE)
            })),
        }),
        "redis" => {
            let Some(url) = redis_url else {
                bail!("`STORE_BACKEND=redis` requires `REDIS_URL`");
            };

            Ok(StoreConfig::Redis {
                url,
                key: env_var_or_else("REDIS_KEY", || String::from(DEFAULT_REDIS_KEY)),
            })
        }
        "memory" => Ok(StoreConfig::Memory),
        other => bail!("Unknown `STORE_BACKEND`: {other}"),
    }
}

fn code_length_from_env() -> Result<usize> {
    let Some(code_length) = env_var("CODE_LENGTH") else {
        return Ok(DEFAULT_LENGTH);
    };

    let code_length = code_length.parse::<usize>()?;

    if code_length == 0 {
        bail!("`CODE_LENGTH` must be larger than 0");
    }

    Ok(code_length)
}
