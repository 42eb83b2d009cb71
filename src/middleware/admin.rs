use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Credential presented in the `X-Admin-Key` header. A missing or non-UTF-8
/// header yields an empty credential, which no authenticator accepts.
#[derive(Debug, Clone)]
pub struct AdminKey(pub String);

impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(AdminKey(key))
    }
}
