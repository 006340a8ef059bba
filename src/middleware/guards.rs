use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::header};
use tracing::debug;

use crate::{
    auth::{
        Claims, RolePolicy,
        jwt::{VerifyError, verify_token},
    },
    error::AppError,
    state::AppState,
};

// Claims land in extensions when the jwt_auth middleware ran; otherwise the
// extractor verifies the bearer token itself.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("missing or invalid authorization header"))?;

        let claims = verify_token(&state.jwt, token).map_err(|err| match err {
            VerifyError::Expired => AppError::unauthorized("token expired"),
            VerifyError::Invalid(cause) => {
                debug!(error = %cause, "bearer token rejected");
                AppError::unauthorized("invalid token")
            }
        })?;

        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

/// Per-handler role check. The policy marker sets the minimum role; any
/// higher-ranked role also passes.
pub struct RoleGuard<P: RolePolicy> {
    pub claims: Claims,
    _marker: PhantomData<P>,
}

impl<P> FromRequestParts<Arc<AppState>> for RoleGuard<P>
where
    P: RolePolicy,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = Claims::from_request_parts(parts, state).await?;

        if !claims.role.satisfies(P::required()) {
            return Err(AppError::forbidden("missing required role"));
        }

        Ok(Self {
            claims,
            _marker: PhantomData,
        })
    }
}
