use axum::{extract::Extension, http::StatusCode, Json};

use crate::app::dto::{ErrorResponse, WhoAmIResponse};
use crate::context::PrincipalContext;

pub const SYSTEM_TAG: &str = "system";

#[utoipa::path(
    get,
    path = "/health",
    tag = SYSTEM_TAG,
    responses((status = 200, description = "Service is up")),
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The account the presented token was issued to.
#[utoipa::path(
    get,
    path = "/whoami",
    tag = SYSTEM_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller identity", body = WhoAmIResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from(&principal))
}
