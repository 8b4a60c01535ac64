//! Database adapters: connection pool construction and schema bootstrap.
//!
//! The pool is built explicitly at startup and handed to the repositories
//! that need it; there is no process-wide engine.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::instrument;

use crate::config::DatabaseConfig;

/// DDL for the product table. Idempotent; this is a bootstrap, not a
/// migration system.
pub const PRODUCTS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    code        VARCHAR(50)    NOT NULL PRIMARY KEY,
    name        VARCHAR(255)   NOT NULL,
    category    VARCHAR(100)   NULL,
    unit_price  NUMERIC(10, 2) NOT NULL CHECK (unit_price > 0),
    inventory   INTEGER        NOT NULL CHECK (inventory >= 0),
    size        VARCHAR(100)   NULL,
    color       VARCHAR(255)   NULL
)
"#;

/// Create the connection pool.
///
/// Connections are health-checked before being handed out, so a database
/// restart surfaces as one slow acquire rather than a failed query.
#[instrument(skip(config), fields(url = %config.redacted_url()), err)]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;
    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Round-trip a trivial query to prove the pool works.
#[instrument(skip(pool), err)]
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    tracing::debug!(result = one, "database ping");
    Ok(())
}

/// Create the product table if it does not exist yet.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(PRODUCTS_TABLE_DDL).execute(pool).await?;
    Ok(())
}

/// Drain and close the pool (graceful shutdown).
pub async fn close(pool: &PgPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}
