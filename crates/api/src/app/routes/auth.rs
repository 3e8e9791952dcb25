use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use shelf_auth::{LoginInput, RegisterInput};

use crate::app::services::AppServices;
use crate::app::dto::{AccessTokenResponse, ErrorResponse};
use crate::app::errors;

pub const AUTH_TAG: &str = "auth";

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account and sign it in.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterInput,
    responses(
        (status = 201, description = "Account created", body = AccessTokenResponse),
        (status = 400, description = "Invalid email or password too short", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    ),
)]
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let creds = match body.validate() {
        Ok(c) => c,
        Err(e) => return errors::validation_error(e),
    };

    match services.auth.register(&creds.email, &creds.password).await {
        Ok(token) => (StatusCode::CREATED, Json(AccessTokenResponse::from(token))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = AUTH_TAG,
    request_body = LoginInput,
    responses(
        (status = 200, description = "Signed in", body = AccessTokenResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    ),
)]
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let creds = match body.validate() {
        Ok(c) => c,
        Err(e) => return errors::validation_error(e),
    };

    match services.auth.login(&creds.email, &creds.password).await {
        Ok(token) => Json(AccessTokenResponse::from(token)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
