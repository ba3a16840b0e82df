// Request extractors: bearer credential and numeric path ids.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use kidsdiy_api::BearerToken;

use crate::error::ProxyError;

/// Optional caller credential. A missing or malformed header is `None`,
/// and the call is forwarded without `Authorization`.
#[derive(Debug, Clone, Default)]
pub struct Bearer(pub Option<BearerToken>);

impl<S: Send + Sync> FromRequestParts<S> for Bearer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(BearerToken::from_authorization);
        Ok(Self(token))
    }
}

/// Numeric `{id}` path segment. A non-numeric id is rejected with a 400
/// envelope instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub u64);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u64>::from_request_parts(parts, state)
            .await
            .map_err(|e| ProxyError::InvalidId(e.body_text()))?;
        Ok(Self(id))
    }
}
