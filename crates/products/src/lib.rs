//! Products domain module.
//!
//! Business rules for the product catalog, implemented as deterministic domain
//! logic plus a persistence port (no HTTP, no concrete storage):
//! - `size`: canonicalization of `/`-delimited size lists
//! - `product`: the product record and its update changeset
//! - `validation`: create/update payload checks
//! - `repository`: the storage port adapters implement
//! - `service`: the CRUD use cases

pub mod product;
pub mod repository;
pub mod service;
pub mod size;
pub mod validation;

pub use product::{ProductChanges, ProductCode, ProductRecord};
pub use repository::{ProductRepository, RepositoryError};
pub use service::{ProductError, ProductService};
pub use size::{SIZE_DELIMITER, Size, SizeError, SizeList, canonicalize};
pub use validation::{
    CreateProductInput, FieldError, Patch, StoredProduct, UpdateProductInput, ValidationErrors,
    restore, validate_create, validate_update,
};
