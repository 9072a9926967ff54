//! Application assembly and lifecycle.

use std::{future::Future, sync::Arc};

use anyhow::Context;
use axum::Router;
use bookshelf_db::{DbModule, DbPool};
use bookshelf_kernel::{
    settings::{Settings, StorageBackend},
    InitCtx, ModuleRegistry,
};

use crate::modules::{
    self,
    books::{
        repository::{InMemoryBookRepository, PostgresBookRepository},
        routes::SharedRepository,
    },
};

/// Registered modules plus the storage they were wired to.
pub struct Application {
    registry: ModuleRegistry,
    pool: Option<DbPool>,
}

impl Application {
    /// Wire modules to the storage backend selected in `settings`.
    ///
    /// For PostgreSQL this connects the pool and registers the `db` core
    /// module that closes it on shutdown.
    pub async fn assemble(settings: &Settings) -> anyhow::Result<Self> {
        match settings.storage {
            StorageBackend::Postgres => {
                let pool = DbPool::connect(&settings.database)
                    .await
                    .context("failed to connect to PostgreSQL")?;
                let repository: SharedRepository =
                    Arc::new(PostgresBookRepository::new(pool.clone()));

                let mut registry = ModuleRegistry::new();
                registry.register_core(Arc::new(DbModule::new(pool.clone())));
                modules::register_all(&mut registry, repository);

                Ok(Self {
                    registry,
                    pool: Some(pool),
                })
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage; books are lost on restart");
                Ok(Self::with_repository(Arc::new(InMemoryBookRepository::new())))
            }
        }
    }

    /// Wire modules to an already-built repository, with no database.
    pub fn with_repository(repository: SharedRepository) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, repository);
        Self {
            registry,
            pool: None,
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Apply pending module migrations; a no-op without a database.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let Some(pool) = &self.pool else {
            tracing::info!("no database configured; skipping migrations");
            return Ok(0);
        };

        let migrations = self.registry.collect_migrations();
        bookshelf_db::run_migrations(pool, &migrations)
            .await
            .context("failed to run migrations")
    }

    /// The full HTTP router with every module mounted.
    pub fn router(&self, settings: &Settings) -> Router {
        bookshelf_http::build_router(&self.registry, settings)
    }

    /// Release storage connections without going through the module lifecycle.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }

    /// Init and start every module, serve until `shutdown`, then stop modules
    /// in reverse order.
    pub async fn serve<F>(self, settings: &Settings, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ctx = InitCtx { settings };

        self.registry.init_core_modules(&ctx).await?;
        self.registry.init_custom_modules(&ctx).await?;
        self.registry.start_core_modules(&ctx).await?;
        self.registry.start_custom_modules(&ctx).await?;

        let served = bookshelf_http::start_server(self.router(settings), settings, shutdown).await;

        self.registry.stop_custom_modules().await?;
        self.registry.stop_core_modules().await?;

        served
    }
}

/// Assemble, migrate, and serve until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        storage = ?settings.storage,
        "bookshelf bootstrap starting"
    );

    let app = Application::assemble(&settings).await?;
    app.migrate().await?;

    tracing::info!("bookshelf bootstrap complete");
    app.serve(&settings, bookshelf_http::shutdown_signal()).await
}
