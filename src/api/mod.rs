//! All API endpoint setup

use axum::Router;
use axum::routing::get;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::empty_as_none;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use request::parse_url;
pub use response::Error;
pub use response::Success;

use crate::redirect;

mod current_user;
mod request;
mod response;
mod short_links;

/// Get the Axum router for all API routes
pub fn router() -> Router {
    let short_links = Router::new()
        .route("/", get(short_links::list).post(short_links::create))
        .route(
            "/{code}",
            get(redirect::redirect).delete(short_links::delete),
        );

    Router::new().nest("/short-links", short_links)
}
