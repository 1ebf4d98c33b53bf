use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{claims::SessionClaims, cookie::read_session_token, session::SessionKeys};
use crate::error::ApiError;

/// Verified claims from the `auth` cookie.
pub struct SessionUser(pub SessionClaims);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = read_session_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let keys = SessionKeys::from_ref(state);
        match keys.verify(&token) {
            Ok(claims) => Ok(SessionUser(claims)),
            Err(e) => {
                warn!(error = %e, "invalid or expired session token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
