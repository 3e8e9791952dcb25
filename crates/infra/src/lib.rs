//! Infrastructure layer: SQLite wiring, stores, and the orchestrating services.

pub mod db;
pub mod services;
pub mod store;

pub use services::{AccessToken, AccountService, AuthService, ProductService, ServiceError};
pub use store::{AccountStore, ProductStore, StoreError};
