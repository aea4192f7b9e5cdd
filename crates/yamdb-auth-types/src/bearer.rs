//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;

/// Raw bearer token from the `Authorization` header, if any.
///
/// A missing header yields `BearerToken(None)` so anonymous reads can proceed.
/// A header that is present but not a well-formed bearer credential is
/// rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Extract synchronously and return a 'static future; an `async fn` here
    // would capture the `parts` borrow.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .typed_try_get::<Authorization<Bearer>>()
            .map(|auth| auth.map(|a| a.token().to_owned()));

        async move {
            token
                .map(BearerToken)
                .map_err(|_| StatusCode::UNAUTHORIZED)
        }
    }
}
