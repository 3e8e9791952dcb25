//! OpenAPI document for the HTTP surface, served with Swagger UI at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use shelf_auth::{LoginInput, RegisterInput};
use shelf_core::FieldError;
use shelf_products::{CreateProductInput, Product, UpdateProductInput};

use crate::app::dto::{AccessTokenResponse, ErrorResponse, WhoAmIResponse};
use crate::app::routes::{auth, products, system};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/docs/openapi.json";

/// Name of the bearer scheme protected operations refer to.
pub const BEARER_SCHEME: &str = "bearer";

#[derive(OpenApi)]
#[openapi(
    info(title = "Shelf", description = "Authenticated product catalog API"),
    paths(
        system::health,
        system::whoami,
        auth::register,
        auth::login,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(schemas(
        RegisterInput,
        LoginInput,
        AccessTokenResponse,
        WhoAmIResponse,
        ErrorResponse,
        FieldError,
        Product,
        CreateProductInput,
        UpdateProductInput,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = auth::AUTH_TAG, description = "Registration and login"),
        (name = products::PRODUCTS_TAG, description = "Product catalog"),
        (name = system::SYSTEM_TAG, description = "Health and identity"),
    ),
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
