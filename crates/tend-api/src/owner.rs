//! The acting owner, read from the `X-Owner-Id` header.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

pub const OWNER_HEADER: &str = "x-owner-id";

/// Extractor for the authenticated owner. Authentication itself happens
/// upstream; this only trusts and parses the header it leaves behind.
#[derive(Debug, Clone, Copy)]
pub struct Owner(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for Owner {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let raw = parts
      .headers
      .get(OWNER_HEADER)
      .ok_or(ApiError::Unauthorized("missing X-Owner-Id header"))?
      .to_str()
      .map_err(|_| ApiError::Unauthorized("X-Owner-Id is not valid text"))?;
    let id = Uuid::parse_str(raw.trim())
      .map_err(|_| ApiError::Unauthorized("X-Owner-Id is not a UUID"))?;
    Ok(Owner(id))
  }
}
