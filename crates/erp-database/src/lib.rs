//! PostgreSQL access for the ERP workbench
//!
//! Holds the user/menu/permission schema and the seeding routine that grants
//! every user a permission row on every menu.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod models;
pub mod queries;
pub mod seed;

pub use models::{MenuDb, PermissionDb, UserDb};
pub use queries::{MenuQueries, PermissionQueries, UserQueries};
pub use seed::{SeedReport, apply_permissions, plan_permissions, seed_permissions};

use erp_core::{Config, Error, Result};
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;
use std::time::Duration;

/// Database connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect using the pool settings in `config.database`
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established.
    pub async fn new(config: &Config) -> Result<Self> {
        let settings = &config.database;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout))
            .idle_timeout(Duration::from_secs(settings.idle_timeout))
            .connect(&settings.url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to run.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Migration failed: {e}")))?;

        Ok(())
    }

    /// Health check
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Health check failed: {e}")))?;

        Ok(())
    }

    /// Seed menu permissions for every user
    ///
    /// # Errors
    ///
    /// Returns an error if loading or writing fails.
    pub async fn seed_permissions(&self, dry_run: bool) -> Result<SeedReport> {
        seed::seed_permissions(&self.pool, dry_run).await
    }
}
