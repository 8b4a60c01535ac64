//! Product use cases: create, read, update, delete.
//!
//! Each call is independent; the only state is what the repository holds.
//! Validation and conflict checks run before any write, so a rejected call
//! never touches storage.

use thiserror::Error;
use tracing::instrument;

use catalog_core::DomainError;

use crate::product::{ProductCode, ProductRecord};
use crate::repository::{ProductRepository, RepositoryError};
use crate::validation::{
    CreateProductInput, UpdateProductInput, ValidationErrors, validate_create, validate_update,
};

/// Use-case failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("product '{0}' not found")]
    NotFound(String),

    #[error("product with code '{0}' already exists")]
    Conflict(String),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for ProductError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(code) => ProductError::Conflict(code),
            RepositoryError::NotFound(code) => ProductError::NotFound(code),
            RepositoryError::Backend(reason) => ProductError::Persistence(reason),
        }
    }
}

impl From<ProductError> for DomainError {
    fn from(err: ProductError) -> Self {
        let msg = err.to_string();
        match err {
            ProductError::Validation(_) => DomainError::Validation(msg),
            ProductError::NotFound(_) => DomainError::NotFound(msg),
            ProductError::Conflict(_) => DomainError::Conflict(msg),
            ProductError::Persistence(_) => DomainError::Persistence(msg),
        }
    }
}

/// CRUD orchestration over a [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    #[instrument(skip(self, input), fields(code = ?input.code))]
    pub async fn create(&self, input: CreateProductInput) -> Result<ProductRecord, ProductError> {
        let record = validate_create(input)?;

        if self.repo.find_by_code(record.code()).await.map_err(log_backend)?.is_some() {
            tracing::warn!(code = %record.code(), "create rejected: code already in use");
            return Err(ProductError::Conflict(record.code().to_string()));
        }

        let stored = self.repo.insert(&record).await.map_err(log_backend)?;
        tracing::info!(code = %stored.code(), "product created");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, code: &str) -> Result<ProductRecord, ProductError> {
        let (_, record) = self.load(code).await?;
        Ok(record)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        code: &str,
        input: UpdateProductInput,
    ) -> Result<ProductRecord, ProductError> {
        let (current_code, current) = self.load(code).await?;
        let changes = validate_update(input)?;

        if changes.is_empty() {
            tracing::debug!("update carries no changes");
            return Ok(current);
        }

        if let Some(new_code) = changes.code().filter(|c| **c != current_code) {
            let taken = self
                .repo
                .find_by_code(new_code)
                .await
                .map_err(log_backend)?
                .is_some();
            if taken {
                tracing::warn!(new_code = %new_code, "rename rejected: code already in use");
                return Err(ProductError::Conflict(new_code.to_string()));
            }
        }

        let updated = current.apply(&changes);
        let stored = self
            .repo
            .update(&current_code, &updated)
            .await
            .map_err(log_backend)?;
        tracing::info!(
            code = %stored.code(),
            fields = ?changes.touched_fields(),
            "product updated"
        );
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, code: &str) -> Result<(), ProductError> {
        let (current_code, _) = self.load(code).await?;
        self.repo.delete(&current_code).await.map_err(log_backend)?;
        tracing::info!(code = %current_code, "product deleted");
        Ok(())
    }

    /// Look up a record by raw code; a code that cannot be valid cannot exist.
    async fn load(&self, code: &str) -> Result<(ProductCode, ProductRecord), ProductError> {
        let Ok(product_code) = ProductCode::parse(code) else {
            return Err(ProductError::NotFound(code.to_string()));
        };
        match self.repo.find_by_code(&product_code).await.map_err(log_backend)? {
            Some(record) => Ok((product_code, record)),
            None => {
                tracing::debug!(code, "product not found");
                Err(ProductError::NotFound(code.to_string()))
            }
        }
    }
}

fn log_backend(err: RepositoryError) -> ProductError {
    if let RepositoryError::Backend(reason) = &err {
        tracing::error!(%reason, "repository call failed");
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::validation::Patch;

    /// Minimal map-backed repository; `fail_writes` simulates a broken store.
    #[derive(Default)]
    struct FakeRepo {
        rows: Mutex<BTreeMap<ProductCode, ProductRecord>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl ProductRepository for FakeRepo {
        async fn find_by_code(
            &self,
            code: &ProductCode,
        ) -> Result<Option<ProductRecord>, RepositoryError> {
            Ok(self.rows.lock().unwrap().get(code).cloned())
        }

        async fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Backend("disk full".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(record.code()) {
                return Err(RepositoryError::Duplicate(record.code().to_string()));
            }
            rows.insert(record.code().clone(), record.clone());
            Ok(record.clone())
        }

        async fn update(
            &self,
            current: &ProductCode,
            record: &ProductRecord,
        ) -> Result<ProductRecord, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Backend("disk full".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            rows.remove(current)
                .ok_or_else(|| RepositoryError::NotFound(current.to_string()))?;
            rows.insert(record.code().clone(), record.clone());
            Ok(record.clone())
        }

        async fn delete(&self, code: &ProductCode) -> Result<(), RepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .remove(code)
                .map(|_| ())
                .ok_or_else(|| RepositoryError::NotFound(code.to_string()))
        }
    }

    fn create_input(json: serde_json::Value) -> CreateProductInput {
        serde_json::from_value(json).unwrap()
    }

    fn update_input(json: serde_json::Value) -> UpdateProductInput {
        serde_json::from_value(json).unwrap()
    }

    fn shirt() -> CreateProductInput {
        create_input(serde_json::json!({
            "code": "A1",
            "name": "Shirt",
            "unit_price": 19.99,
            "inventory": 5,
            "size": "M/S",
        }))
    }

    #[tokio::test]
    async fn create_then_get() {
        let service = ProductService::new(FakeRepo::default());
        let created = service.create(shirt()).await.unwrap();
        assert_eq!(created.size().map(|s| s.to_string()), Some("M/S".to_string()));

        let fetched = service.get("A1").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_duplicate_is_conflict_and_keeps_existing() {
        let service = ProductService::new(FakeRepo::default());
        let original = service.create(shirt()).await.unwrap();

        let mut again = shirt();
        again.name = Patch::Value("Other".to_string());
        let err = service.create(again).await.unwrap_err();
        assert_eq!(err, ProductError::Conflict("A1".to_string()));
        assert_eq!(service.get("A1").await.unwrap(), original);
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_store() {
        let service = ProductService::new(FakeRepo {
            fail_writes: true,
            ..FakeRepo::default()
        });
        let err = service
            .create(create_input(serde_json::json!({ "code": "A1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn get_unknown_or_impossible_code_is_not_found() {
        let service = ProductService::new(FakeRepo::default());
        assert_eq!(
            service.get("nope").await.unwrap_err(),
            ProductError::NotFound("nope".to_string())
        );
        let too_long = "x".repeat(80);
        assert!(matches!(
            service.get(&too_long).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_unknown_code_is_not_found() {
        let service = ProductService::new(FakeRepo::default());
        let err = service
            .update("missing", update_input(serde_json::json!({ "inventory": 1 })))
            .await
            .unwrap_err();
        assert_eq!(err, ProductError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn update_inventory_only_leaves_other_fields() {
        let service = ProductService::new(FakeRepo::default());
        let before = service.create(shirt()).await.unwrap();

        let after = service
            .update("A1", update_input(serde_json::json!({ "inventory": 42 })))
            .await
            .unwrap();

        assert_eq!(after.inventory(), 42);
        assert_eq!(after.name(), before.name());
        assert_eq!(after.unit_price(), before.unit_price());
        assert_eq!(after.size(), before.size());
        assert_eq!(after.color(), before.color());
        assert_eq!(after.category(), before.category());
    }

    #[tokio::test]
    async fn invalid_size_update_leaves_record_unchanged() {
        let service = ProductService::new(FakeRepo::default());
        let before = service.create(shirt()).await.unwrap();

        let err = service
            .update("A1", update_input(serde_json::json!({ "size": "L/S/S" })))
            .await
            .unwrap_err();
        match err {
            ProductError::Validation(errors) => assert!(errors.field("size").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(service.get("A1").await.unwrap(), before);

        let after = service
            .update("A1", update_input(serde_json::json!({ "size": "L/S" })))
            .await
            .unwrap();
        assert_eq!(after.size().map(|s| s.to_string()), Some("L/S".to_string()));
    }

    #[tokio::test]
    async fn rename_moves_record() {
        let service = ProductService::new(FakeRepo::default());
        service.create(shirt()).await.unwrap();

        let renamed = service
            .update("A1", update_input(serde_json::json!({ "code": "B2" })))
            .await
            .unwrap();
        assert_eq!(renamed.code().as_str(), "B2");
        assert!(matches!(service.get("A1").await, Err(ProductError::NotFound(_))));
        assert!(service.get("B2").await.is_ok());
    }

    #[tokio::test]
    async fn rename_onto_existing_code_is_conflict() {
        let service = ProductService::new(FakeRepo::default());
        let a1 = service.create(shirt()).await.unwrap();
        let mut other = shirt();
        other.code = Patch::Value("B2".to_string());
        let b2 = service.create(other).await.unwrap();

        let err = service
            .update(
                "A1",
                update_input(serde_json::json!({ "code": "B2", "inventory": 0 })),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ProductError::Conflict("B2".to_string()));
        assert_eq!(service.get("A1").await.unwrap(), a1);
        assert_eq!(service.get("B2").await.unwrap(), b2);
    }

    #[tokio::test]
    async fn rename_to_same_code_is_not_a_conflict() {
        let service = ProductService::new(FakeRepo::default());
        service.create(shirt()).await.unwrap();

        let updated = service
            .update(
                "A1",
                update_input(serde_json::json!({ "code": "A1", "name": "Tee" })),
            )
            .await
            .unwrap();
        assert_eq!(updated.name(), "Tee");
    }

    #[tokio::test]
    async fn delete_twice_second_is_not_found() {
        let service = ProductService::new(FakeRepo::default());
        service.create(shirt()).await.unwrap();

        service.delete("A1").await.unwrap();
        assert_eq!(
            service.delete("A1").await.unwrap_err(),
            ProductError::NotFound("A1".to_string())
        );
    }

    #[tokio::test]
    async fn store_failure_is_reported_as_persistence_error() {
        let service = ProductService::new(FakeRepo {
            fail_writes: true,
            ..FakeRepo::default()
        });
        let err = service.create(shirt()).await.unwrap_err();
        assert_eq!(err, ProductError::Persistence("disk full".to_string()));
        assert!(service.repository().rows.lock().unwrap().is_empty());
    }

    #[test]
    fn product_errors_map_onto_domain_errors() {
        let err: DomainError = ProductError::Conflict("A1".to_string()).into();
        assert_eq!(
            err,
            DomainError::Conflict("product with code 'A1' already exists".to_string())
        );
        let err: DomainError = ProductError::Persistence("boom".to_string()).into();
        assert!(!err.is_rejection());
    }
}
