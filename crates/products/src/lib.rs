//! Products domain module.
//!
//! Plain product records plus the pure rules around them (price arithmetic,
//! input validation, partial-update merge). No IO, no HTTP, no storage.

pub mod input;
pub mod price;
pub mod product;

pub use input::{CreateProductInput, UpdateProductInput};
pub use price::{Price, PriceError, MAX_PRICE_CENTS};
pub use product::{NewProduct, Product, ProductPatch};
