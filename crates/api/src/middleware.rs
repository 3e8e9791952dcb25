use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use shelf_auth::TokenVerifier;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Reject requests without a valid bearer token; otherwise attach the caller
/// as a [`PrincipalContext`] extension.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(unauthorized)?;

    let claims = state.tokens.verify(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        unauthorized()
    })?;

    req.extensions_mut().insert(PrincipalContext::from(claims));

    Ok(next.run(req).await)
}

/// One line per request: method, path, status and latency.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}

fn unauthorized() -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized")
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }
    Some(token)
}
