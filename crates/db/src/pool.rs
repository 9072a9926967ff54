//! Connection pool wrapper.

use std::time::Duration;

use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::DbError;

/// Shared PostgreSQL connection pool.
///
/// Cloning is cheap; every clone refers to the same underlying pool.
#[derive(Clone, Debug)]
pub struct DbPool {
    inner: PgPool,
}

impl DbPool {
    /// Connect using the configured URL, pool size, and acquire timeout.
    ///
    /// # Errors
    ///
    /// Returns `DbError::ConnectionFailed` if no connection can be established.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        tracing::info!(
            max_connections = settings.max_connections,
            "connecting to PostgreSQL"
        );

        let inner = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .connect(&settings.url)
            .await
            .map_err(DbError::ConnectionFailed)?;

        Ok(Self { inner })
    }

    /// Connect to `url` with default pool options.
    pub async fn connect_url(url: &str) -> Result<Self, DbError> {
        Self::connect(&DatabaseSettings {
            url: url.to_string(),
            ..DatabaseSettings::default()
        })
        .await
    }

    /// Borrow the underlying sqlx pool for query execution.
    pub fn inner(&self) -> &PgPool {
        &self.inner
    }

    /// Close every connection; pending acquires fail afterwards.
    pub async fn close(&self) {
        self.inner.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
