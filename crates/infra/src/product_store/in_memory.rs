use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use catalog_core::Entity;
use catalog_products::{ProductCode, ProductRecord, ProductRepository, RepositoryError};

/// In-memory product store for tests/dev.
///
/// Uniqueness is enforced under the write lock, so two concurrent inserts of
/// the same code cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<HashMap<ProductCode, ProductRecord>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Backend("in-memory product store lock poisoned".to_string())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_code(
        &self,
        code: &ProductCode,
    ) -> Result<Option<ProductRecord>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(code).cloned())
    }

    async fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(record.id()) {
            return Err(RepositoryError::Duplicate(record.id().to_string()));
        }
        map.insert(record.id().clone(), record.clone());
        Ok(record.clone())
    }

    async fn update(
        &self,
        current: &ProductCode,
        record: &ProductRecord,
    ) -> Result<ProductRecord, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if !map.contains_key(current) {
            return Err(RepositoryError::NotFound(current.to_string()));
        }
        if record.id() != current && map.contains_key(record.id()) {
            return Err(RepositoryError::Duplicate(record.id().to_string()));
        }
        map.remove(current);
        map.insert(record.id().clone(), record.clone());
        Ok(record.clone())
    }

    async fn delete(&self, code: &ProductCode) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.remove(code) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(code.to_string())),
        }
    }
}
