//! Persistence port for product records.
//!
//! The service depends only on this trait; adapters (Postgres, in-memory)
//! live in `catalog-infra`. Implementations must enforce `code` uniqueness
//! themselves: the service's existence pre-check can race, the store cannot.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::product::{ProductCode, ProductRecord};

/// Repository operation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A record with this code already exists (insert or rename).
    #[error("duplicate product code '{0}'")]
    Duplicate(String),

    /// No record stored under this code.
    #[error("no product stored under code '{0}'")]
    NotFound(String),

    /// Any other store failure (connection, query, corrupt row, ...).
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_code(&self, code: &ProductCode)
    -> Result<Option<ProductRecord>, RepositoryError>;

    /// Insert a new record and return it as stored.
    async fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, RepositoryError>;

    /// Replace the record stored under `current` with `record` (which may
    /// carry a new code) in a single write, returning it as stored.
    async fn update(
        &self,
        current: &ProductCode,
        record: &ProductRecord,
    ) -> Result<ProductRecord, RepositoryError>;

    async fn delete(&self, code: &ProductCode) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn find_by_code(
        &self,
        code: &ProductCode,
    ) -> Result<Option<ProductRecord>, RepositoryError> {
        (**self).find_by_code(code).await
    }

    async fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, RepositoryError> {
        (**self).insert(record).await
    }

    async fn update(
        &self,
        current: &ProductCode,
        record: &ProductRecord,
    ) -> Result<ProductRecord, RepositoryError> {
        (**self).update(current, record).await
    }

    async fn delete(&self, code: &ProductCode) -> Result<(), RepositoryError> {
        (**self).delete(code).await
    }
}
