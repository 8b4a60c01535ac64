//! Infrastructure layer: configuration, database pool, repository adapters.

pub mod config;
pub mod db;
pub mod product_store;

pub use config::{ConfigError, DatabaseConfig};
pub use product_store::{InMemoryProductRepository, PostgresProductRepository};
