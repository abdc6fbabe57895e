use crate::Result as DbErrorResult;

use std::time::Duration;

use log::info;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Open the store-of-record pool. The pool is the single shared client for every caller.
pub async fn connect(
    url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> DbErrorResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(url)
        .await?;

    info!("Database pool ready (max {} connections)", max_connections);
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> DbErrorResult<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations complete");
    Ok(())
}
