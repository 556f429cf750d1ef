//! Request extractors.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::foundation::UserId;

use super::error::ApiError;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Account id asserted by the storefront, when the visitor is signed in.
///
/// Identity is verified upstream; this service only records it. A header
/// that is present but blank is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalUser(pub Option<UserId>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(OptionalUser(None));
        };
        let raw = value.to_str().unwrap_or_default();
        let user_id = UserId::new(raw)?;
        Ok(OptionalUser(Some(user_id)))
    }
}
