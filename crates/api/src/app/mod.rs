//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: stores and services behind the handlers
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: response bodies
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: OpenAPI document behind the Swagger UI

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shelf_auth::{Hs256Jwt, TokenVerifier};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Opens the database and runs migrations before returning.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let pool = shelf_infra::db::connect(&config.db_path)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path))?;

    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes(), config.jwt_expires_in));
    let services = services::build_services(pool, jwt.clone(), config.bcrypt_cost)
        .context("invalid BCRYPT_COST")?;

    Ok(router(Arc::new(services), jwt))
}

/// Routes over already-built services.
pub fn router(services: Arc<AppServices>, tokens: Arc<dyn TokenVerifier>) -> Router {
    let auth_state = middleware::AuthState { tokens };

    // Protected routes: require a valid bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .merge(protected)
        .merge(
            SwaggerUi::new(openapi::DOCS_PATH)
                .url(openapi::OPENAPI_JSON_PATH, openapi::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}
