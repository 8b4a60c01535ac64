//! Product repository adapters.
//!
//! Both implement `catalog_products::ProductRepository`:
//! - `InMemoryProductRepository`: map-backed, for development and tests
//! - `PostgresProductRepository`: the `items` table via SQLx

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;
