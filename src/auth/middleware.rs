// Bearer token extraction for account routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::error::ServiceError;
use crate::AppState;

/// Caller identity taken from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                debug!("Missing bearer token on {}", parts.uri.path());
                ServiceError::Unauthenticated
            })?;

        let claims = state.tokens.decode(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
        })
    }
}
