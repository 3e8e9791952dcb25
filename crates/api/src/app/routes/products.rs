use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use shelf_products::{CreateProductInput, Product, UpdateProductInput};

use crate::app::dto::ErrorResponse;
use crate::app::errors;
use crate::app::services::AppServices;

pub const PRODUCTS_TAG: &str = "products";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/products",
    tag = PRODUCTS_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All products, oldest first", body = Vec<Product>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.products.find_all().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = PRODUCTS_TAG,
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
)]
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    match services.products.find_one(&id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/products",
    tag = PRODUCTS_TAG,
    security(("bearer" = [])),
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateProductInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let input = match body.validate() {
        Ok(p) => p,
        Err(e) => return errors::validation_error(e),
    };

    match services.products.create(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Partial update: absent keys are left alone, `null` clears nullable fields.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = PRODUCTS_TAG,
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
)]
pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductInput>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let patch = match body.validate() {
        Ok(p) => p,
        Err(e) => return errors::validation_error(e),
    };

    match services.products.update(&id, patch).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = PRODUCTS_TAG,
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
)]
pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    match services.products.remove(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
