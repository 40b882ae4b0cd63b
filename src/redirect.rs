//! The redirect!
//!
//! The most important part of Snaplink, sending visitors on to the original URL

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use url::Url;

use crate::api::Error;
use crate::api::PathParameters;
use crate::store;
use crate::store::Store;

/// The redirect!
///
/// Looks up the short code, ignoring case, and counts the click
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/s/aB3dE9
/// ```
pub async fn redirect(
    Extension(store): Extension<Store>,
    PathParameters(code): PathParameters<String>,
) -> Result<(StatusCode, HeaderMap), Error> {
    tracing::debug!("Looking for short code: {code}");

    let link = match store.resolve(&code).await {
        Ok(link) => link,
        Err(store::Error::NotFound) => {
            tracing::debug!(r#"Short code "{code}" not found"#);

            return Err(Error::not_found("Short link not found"));
        }
        Err(store::Error::Degraded) => {
            tracing::warn!(r#"Short code "{code}" not found, storage could not be read"#);

            return Err(store::Error::Degraded.into());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::debug!(r#"Short code "{code}" redirecting to: {}"#, link.original_url);

    // the parsed form is percent-encoded, safe for a header
    let location = Url::parse(&link.original_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| Error::internal_server_error("Stored URL is invalid"))?;

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Ok((StatusCode::FOUND, headers))
}

/// Everything that is not routed
#[allow(clippy::unused_async)]
pub async fn not_found() -> Error {
    Error::not_found("Not found")
}
