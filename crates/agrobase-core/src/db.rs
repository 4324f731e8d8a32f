use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::config::DatabaseConfig;

pub type DbPool = Pool<Postgres>;

/// Open a Postgres pool sized and timed by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL (or AGROBASE_DATABASE_URL) must be set")?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .with_context(|| "failed to connect to Postgres")
}

/// Run database migrations embedded at compile-time.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .with_context(|| "failed to run database migrations")
}
