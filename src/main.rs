#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::router;
use crate::config::Config;
use crate::store::Store;

mod api;
mod codes;
mod config;
mod graceful_shutdown;
mod links;
mod redirect;
mod store;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "snaplink=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;
    let app = setup_app(&config)?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if the configured store can not be set up
pub fn setup_app(config: &Config) -> Result<Router> {
    let store = Store::from_config(&config.store, config.code_length)?;

    Ok(create_router(
        store,
        JwtKeys::new(config.jwt_secret.as_bytes()),
    ))
}

/// Create the router for Snaplink
fn create_router(store: Store, jwt_keys: JwtKeys) -> Router {
    Router::new()
        .nest("/api", router())
        .route("/s/{code}", get(redirect::redirect))
        .fallback(redirect::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(store))
        .layer(Extension(jwt_keys))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
