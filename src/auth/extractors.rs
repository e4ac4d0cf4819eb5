use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::{Identity, JwtKeys};
use crate::error::AppError;

/// Authenticated caller, decoded from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            email: identity.email,
        }
    }
}

/// Header validation without any store access. Only the part count is
/// checked; the scheme word itself is not compared.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("No token".into()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid auth header".into()))?;

    let parts: Vec<&str> = value.split(' ').collect();
    let [_, token] = parts.as_slice() else {
        return Err(AppError::Unauthenticated("Invalid auth header".into()));
    };

    match keys.verify(token) {
        Ok(identity) => Ok(identity.into()),
        Err(_) => {
            warn!("invalid or expired token");
            Err(AppError::Unauthenticated("Token invalid".into()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        authenticate(&parts.headers, &keys)
    }
}
