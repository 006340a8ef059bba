use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Request as HttpRequest, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};
use tracing::debug;

use crate::{
    auth::{Claims, Role, jwt::VerifyError, jwt::verify_token},
    error::AppError,
    state::AppState,
};

/// Verify the bearer token and stash the claims in request extensions for
/// downstream guards and handlers.
pub async fn jwt_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized("missing or invalid authorization header").into_response()
    })?;

    let claims = verify_token(&state.jwt, token).map_err(|err| {
        let message = match err {
            VerifyError::Expired => "token expired",
            VerifyError::Invalid(ref cause) => {
                debug!(error = %cause, "bearer token rejected");
                "invalid token"
            }
        };
        AppError::unauthorized(message).into_response()
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[derive(Clone)]
pub struct RequireRoleLayer {
    required: Role,
}

impl RequireRoleLayer {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

#[derive(Clone)]
pub struct RequireRole<S> {
    inner: S,
    required: Role,
}

impl<S> Layer<S> for RequireRoleLayer {
    type Service = RequireRole<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRole {
            inner,
            required: self.required,
        }
    }
}

impl<S> Service<HttpRequest<Body>> for RequireRole<S>
where
    S: Service<HttpRequest<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: HttpRequest<Body>) -> Self::Future {
        let required = self.required;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let claims = match req.extensions().get::<Claims>() {
                Some(claims) => claims,
                None => {
                    return Ok(
                        AppError::unauthorized("authentication required").into_response()
                    );
                }
            };

            if !claims.role.satisfies(required) {
                return Ok(AppError::forbidden("missing required role").into_response());
            }

            inner.call(req).await
        })
    }
}
