//! Postgres-backed product repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError | Scenario |
//! |------------|----------------------|-----------------|----------|
//! | Database (unique violation) | `23505` | `Duplicate` | Insert/rename raced the pre-check |
//! | Database (other) | Any other | `Backend` | Check constraint, type errors, ... |
//! | PoolTimedOut / PoolClosed | N/A | `Backend` | No connection available |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! Every write is a single statement, so a failure leaves the row exactly as
//! it was. Reads go through the same validation as client input: a row that
//! violates the catalog invariants is reported as a backend error instead of
//! leaking out.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{Span, instrument};

use catalog_products::{
    ProductCode, ProductRecord, ProductRepository, RepositoryError, StoredProduct, restore,
};

/// Columns selected/returned by every statement, in record order.
const PRODUCT_COLUMNS: &str =
    "name, code, category, unit_price::float8 AS unit_price, inventory, size, color";

/// Postgres-backed product repository over the `items` table.
///
/// ## Thread Safety
///
/// Uses SQLx connection pool which is thread-safe (`PgPool` is a cheap,
/// reference-counted handle).
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), fields(code = %code, found = tracing::field::Empty), err)]
    async fn find_by_code(
        &self,
        code: &ProductCode,
    ) -> Result<Option<ProductRecord>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM items WHERE code = $1");
        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_code", code, e))?;

        Span::current().record("found", row.is_some());
        row.map(|r| record_from_row(&r)).transpose()
    }

    #[instrument(skip(self, record), fields(code = %record.code()), err)]
    async fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, RepositoryError> {
        let stored = StoredProduct::from(record);
        let sql = format!(
            r#"
            INSERT INTO items (name, code, category, unit_price, inventory, size, color)
            VALUES ($1, $2, $3, $4::numeric, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&stored.name)
            .bind(&stored.code)
            .bind(&stored.category)
            .bind(stored.unit_price)
            .bind(stored.inventory)
            .bind(&stored.size)
            .bind(&stored.color)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", record.code(), e))?;

        record_from_row(&row)
    }

    #[instrument(
        skip(self, record),
        fields(current = %current, code = %record.code()),
        err
    )]
    async fn update(
        &self,
        current: &ProductCode,
        record: &ProductRecord,
    ) -> Result<ProductRecord, RepositoryError> {
        let stored = StoredProduct::from(record);
        let sql = format!(
            r#"
            UPDATE items SET
                name = $1,
                code = $2,
                category = $3,
                unit_price = $4::numeric,
                inventory = $5,
                size = $6,
                color = $7
            WHERE code = $8
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&stored.name)
            .bind(&stored.code)
            .bind(&stored.category)
            .bind(stored.unit_price)
            .bind(stored.inventory)
            .bind(&stored.size)
            .bind(&stored.color)
            .bind(current.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", record.code(), e))?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(RepositoryError::NotFound(current.to_string())),
        }
    }

    #[instrument(skip(self), fields(code = %code), err)]
    async fn delete(&self, code: &ProductCode) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE code = $1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", code, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(code.to_string()));
        }
        Ok(())
    }
}

fn record_from_row(row: &PgRow) -> Result<ProductRecord, RepositoryError> {
    let stored = stored_from_row(row)
        .map_err(|e| RepositoryError::Backend(format!("failed to read product row: {e}")))?;
    let code = stored.code.clone();
    restore(stored).map_err(|e| {
        RepositoryError::Backend(format!("stored product '{code}' violates invariants: {e}"))
    })
}

fn stored_from_row(row: &PgRow) -> Result<StoredProduct, sqlx::Error> {
    Ok(StoredProduct {
        name: row.try_get("name")?,
        code: row.try_get("code")?,
        category: row.try_get("category")?,
        unit_price: row.try_get("unit_price")?,
        inventory: row.try_get("inventory")?,
        size: row.try_get("size")?,
        color: row.try_get("color")?,
    })
}

/// Map SQLx errors to RepositoryError.
fn map_sqlx_error(operation: &str, code: &ProductCode, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().is_some_and(|c| c.as_ref() == UNIQUE_VIOLATION) {
                return RepositoryError::Duplicate(code.to_string());
            }
            RepositoryError::Backend(format!(
                "database error in {operation}: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Backend(format!("timed out waiting for a connection in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Backend(format!("connection pool closed in {operation}"))
        }
        other => RepositoryError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_products::{
        CreateProductInput, ProductError, ProductService, UpdateProductInput, validate_create,
        validate_update,
    };

    use crate::config::DatabaseConfig;
    use crate::db;

    #[test]
    fn pool_errors_become_backend_errors() {
        let code = ProductCode::parse("A1").unwrap();
        let err = map_sqlx_error("insert", &code, sqlx::Error::PoolTimedOut);
        assert_eq!(
            err,
            RepositoryError::Backend("timed out waiting for a connection in insert".to_string())
        );
        let err = map_sqlx_error("delete", &code, sqlx::Error::RowNotFound);
        assert!(matches!(
            err,
            RepositoryError::Backend(msg) if msg.starts_with("sqlx error in delete")
        ));
    }

    fn create_record(code: &str, unit_price: f64) -> ProductRecord {
        let input: CreateProductInput = serde_json::from_value(serde_json::json!({
            "code": code,
            "name": "Shirt",
            "unit_price": unit_price,
            "inventory": 5,
            "size": "S/M",
        }))
        .unwrap();
        validate_create(input).unwrap()
    }

    fn rename_to(code: &str) -> catalog_products::ProductChanges {
        let input: UpdateProductInput =
            serde_json::from_value(serde_json::json!({ "code": code })).unwrap();
        validate_update(input).unwrap()
    }

    /// Runs the CRUD contract against a live database.
    #[tokio::test]
    #[ignore = "requires a running Postgres reachable via DATABASE_URL"]
    async fn crud_contract_against_postgres() {
        let config = DatabaseConfig::from_env().unwrap();
        let pool = db::connect(&config).await.unwrap();
        db::ensure_schema(&pool).await.unwrap();
        db::ping(&pool).await.unwrap();

        let repo = PostgresProductRepository::new(pool.clone());
        let a1 = ProductCode::parse("it-pg-A1").unwrap();
        let b2 = ProductCode::parse("it-pg-B2").unwrap();
        let c3 = ProductCode::parse("it-pg-C3").unwrap();
        for code in [&a1, &b2, &c3] {
            let _ = repo.delete(code).await;
        }

        let record = create_record("it-pg-A1", 19.999);
        let stored = repo.insert(&record).await.unwrap();
        // Validation already rounded to cents; the column agrees.
        assert_eq!(stored.unit_price(), 20.0);
        assert_eq!(stored, record);
        assert_eq!(
            repo.insert(&record).await.unwrap_err(),
            RepositoryError::Duplicate("it-pg-A1".to_string())
        );
        let other = repo.insert(&create_record("it-pg-B2", 5.0)).await.unwrap();

        // Rename onto an existing code is rejected by the unique key.
        let onto_b2 = stored.apply(&rename_to("it-pg-B2"));
        assert_eq!(
            repo.update(&a1, &onto_b2).await.unwrap_err(),
            RepositoryError::Duplicate("it-pg-B2".to_string())
        );
        assert_eq!(repo.find_by_code(&b2).await.unwrap(), Some(other));
        assert_eq!(repo.find_by_code(&a1).await.unwrap(), Some(stored.clone()));

        // Updating a row that is gone reports NotFound.
        let missing = ProductCode::parse("it-pg-missing").unwrap();
        assert_eq!(
            repo.update(&missing, &stored).await.unwrap_err(),
            RepositoryError::NotFound("it-pg-missing".to_string())
        );

        // Successful rename comes back through RETURNING under the new code.
        let onto_c3 = stored.apply(&rename_to("it-pg-C3"));
        let renamed = repo.update(&a1, &onto_c3).await.unwrap();
        assert_eq!(renamed.code(), &c3);
        assert_eq!(renamed.name(), "Shirt");
        assert!(repo.find_by_code(&a1).await.unwrap().is_none());

        let service = ProductService::new(repo.clone());
        assert!(matches!(
            service.get("it-pg-missing").await,
            Err(ProductError::NotFound(_))
        ));

        repo.delete(&c3).await.unwrap();
        repo.delete(&b2).await.unwrap();
        assert_eq!(
            repo.delete(&c3).await.unwrap_err(),
            RepositoryError::NotFound("it-pg-C3".to_string())
        );
        db::close(&pool).await;
    }
}
