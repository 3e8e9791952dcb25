use axum::{routing::get, Router};

pub mod auth;
pub mod products;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/products", products::router())
}
