use async_trait::async_trait;
use bookshelf_kernel::{InitCtx, Module};

use crate::pool::DbPool;

/// Core module owning the PostgreSQL pool lifetime.
///
/// Registered first and stopped last, so the pool outlives every module that
/// queries through it.
pub struct DbModule {
    pool: DbPool,
}

impl DbModule {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(self.pool.inner()).await?;
        tracing::info!(module = self.name(), "database reachable");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
