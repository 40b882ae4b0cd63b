//! Current user service
//!
//! Get the calling principal from the request based on the Authorization header. Tokens are
//! issued by the identity provider, only the subject is used here.

use std::ops::Deref;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;

use crate::api::Error;

/// The key used for verifying tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The decoding key
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create a new decoding key, derived from a secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The JWT claims identifying a principal
#[derive(Debug, Deserialize)]
struct Claims {
    /// Opaque ID of the principal
    sub: String,
}

/// Current user service
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// Opaque ID of the principal, owner of the links it creates
    id: String,
}

impl Deref for CurrentUser {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Unauthorized").with_description("Missing token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        // exp is required and checked
        let validation = Validation::default();

        let token_data = decode::<Claims>(bearer.token(), &jwt_keys.decoding, &validation)
            .map_err(|err| {
                Error::unauthorized("Unauthorized").with_description(format!("Invalid token: {err}"))
            })?;

        let id = token_data.claims.sub;

        if id.trim().is_empty() {
            return Err(Error::unauthorized("Unauthorized").with_description("Missing subject"));
        }

        Ok(CurrentUser { id })
    }
}
