use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use catalog_infra::{InMemoryProductRepository, PostgresProductRepository, db};
use catalog_products::{ProductRepository, ProductService};

use crate::config::AppConfig;

/// Product service over a type-erased repository.
pub type Products = ProductService<Arc<dyn ProductRepository>>;

/// Everything request handlers need, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    products: Products,
    /// Present when backed by Postgres; closed on shutdown.
    pool: Option<PgPool>,
}

impl AppServices {
    /// Wire the service over an arbitrary repository.
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            products: ProductService::new(repo),
            pool: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }

    pub fn persistent(pool: PgPool) -> Self {
        let repo = Arc::new(PostgresProductRepository::new(pool.clone()));
        Self {
            products: ProductService::new(repo),
            pool: Some(pool),
        }
    }

    pub fn products(&self) -> &Products {
        &self.products
    }

    /// Release external resources (the connection pool, if any).
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            db::close(pool).await;
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if !config.use_persistent_stores {
        tracing::info!("using in-memory product store");
        return Ok(AppServices::in_memory());
    }

    let pool = db::connect(&config.database)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.redacted_url()))?;
    db::ping(&pool).await.context("database ping failed")?;
    db::ensure_schema(&pool)
        .await
        .context("failed to create the products table")?;

    tracing::info!("using Postgres product store");
    Ok(AppServices::persistent(pool))
}
