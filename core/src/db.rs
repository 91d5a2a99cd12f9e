// larder/src/db.rs

//! Pool construction. Components receive a `SqlitePool` at construction and acquire a
//! connection or a transaction per operation; nothing here is global.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a pool on `database_url` and brings the schema up to date.
#[instrument(name = "db::connect", skip(database_url))]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(database_url)?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(Duration::from_secs(5));

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections.max(1))
    .connect_with(options)
    .await?;

  migrate(&pool).await?;
  info!("Database pool ready.");
  Ok(pool)
}

/// A private in-memory database with the schema applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is pinned to a
/// single connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .min_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect_with(options)
    .await?;
  migrate(&pool).await?;
  Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
  MIGRATOR.run(pool).await?;
  Ok(())
}
