//! Short links API endpoints
//!
//! Everything related to the short links management, scoped to the current user

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::links::ShortLink;
use crate::store::Page;
use crate::store::Store;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::parse_url;

/// Page used when none is asked for
const DEFAULT_PAGE: usize = 1;

/// Page size used when none is asked for
const DEFAULT_LIMIT: usize = 10;

/// Create short link form
#[derive(Debug, Deserialize)]
pub struct CreateShortLinkForm {
    /// Url to shorten, `https://` is assumed when no scheme is given
    url: Option<String>,
}

/// Create a short link based on the [`CreateShortLinkForm`](CreateShortLinkForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "url": "https://www.example.com/" }' \
///     http://localhost:6000/api/short-links
/// ```
///
/// Response
/// ```json
/// { "id": "<uuid>", "shortCode": "aB3dE9", "originalUrl": "https://www.example.com/" ... }
/// ```
pub async fn create(
    Extension(store): Extension<Store>,
    current_user: CurrentUser,
    Form(form): Form<CreateShortLinkForm>,
) -> Result<Success<ShortLink>, Error> {
    let url = parse_url(form.url.as_deref())?;

    let link = store.create(&url, Some(&*current_user)).await?;

    Ok(Success::created(link))
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct ListParameters {
    /// Page to show, starts at 1
    #[serde(default, deserialize_with = "super::empty_as_none")]
    page: Option<usize>,

    /// Number of links per page
    #[serde(default, deserialize_with = "super::empty_as_none")]
    limit: Option<usize>,
}

/// A page of short links going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Links on the page, newest first
    links: Vec<ShortLink>,

    /// Number of links of the user
    total: usize,

    /// Number of pages
    total_pages: usize,

    /// Storage could not be read, the page is empty because of it
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    degraded: bool,
}

impl ListResponse {
    /// Create a response from a [`Page`](Page)
    fn from_page(page: Page) -> Self {
        Self {
            links: page.links,
            total: page.total,
            total_pages: page.total_pages,
            degraded: page.degraded,
        }
    }
}

/// List the short links of the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:6000/api/short-links?page=1&limit=10'
/// ```
///
/// Response:
/// ```json
/// { "links": [ { "id": "<uuid>", "shortCode": "aB3dE9" ... } ], "total": 1, "totalPages": 1 }
/// ```
pub async fn list(
    Extension(store): Extension<Store>,
    current_user: CurrentUser,
    QueryParameters(parameters): QueryParameters<ListParameters>,
) -> Success<ListResponse> {
    let page = store
        .list(
            parameters.page.unwrap_or(DEFAULT_PAGE),
            parameters.limit.unwrap_or(DEFAULT_LIMIT),
            Some(&*current_user),
        )
        .await;

    Success::ok(ListResponse::from_page(page))
}

/// Delete a short link of the current user
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/short-links/<uuid>
/// ```
pub async fn delete(
    Extension(store): Extension<Store>,
    current_user: CurrentUser,
    PathParameters(id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    if store.delete(&id, Some(&*current_user)).await? {
        Ok(Success::<&'static str>::no_content())
    } else {
        Err(Error::not_found("Short link not found"))
    }
}
