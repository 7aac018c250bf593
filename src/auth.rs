use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::Role;
use crate::error::ApiError;
use crate::state::AppState;

// Claims as issued by the auth service; this service only verifies them.
// Tokens may carry more (email, display name), which is ignored here.
#[derive(Debug, Deserialize)]
struct Claims {
    id: String,
    role: Role,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

impl Identity {
    pub fn require_judge(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Judge | Role::Admin => Ok(()),
            Role::Participant => Err(ApiError::Forbidden("Judge or admin role required")),
        }
    }
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix("token=").map(str::to_string))
}

fn verify(token: &str, secret: &str) -> Result<Identity, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token"))?;

    let claims = data.claims;
    Ok(Identity {
        id: claims.id,
        role: claims.role,
    })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token =
            token_from_parts(parts).ok_or(ApiError::Unauthorized("Authentication required"))?;
        verify(&token, &state.config.jwt_secret)
    }
}

// For endpoints that are public but personalize their response when a valid
// token happens to be present.
pub struct OptionalIdentity(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = token_from_parts(parts)
            .and_then(|token| verify(&token, &state.config.jwt_secret).ok());
        Ok(OptionalIdentity(identity))
    }
}
