//! Relational storage for the nearby-events data model.
//!
//! Every repository function takes a `&mut SqliteConnection` so callers can
//! compose several of them inside one transaction. Deletes go through
//! [`policy`], which enacts the cascade/nullify table explicitly. Handlers
//! that write open a [`WriteTransaction`].

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;

pub mod areas;
pub mod countries;
mod error;
pub mod events;
pub mod policy;
pub mod reservations;
pub mod seed;
pub mod tickets;
mod transaction;
pub mod users;

pub use error::{DbError, DbResult};
pub use transaction::WriteTransaction;

const ACQUIRE_TIMEOUT_SECS: u64 = 5;
const BUSY_TIMEOUT_SECS: u64 = 5;

pub async fn connect(config: &Config) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await?;

    info!(url = %config.database_url, "Connected to database");
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> DbResult<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// A migrated, private in-memory database.
///
/// Pinned to a single connection that is never recycled: each SQLite memory
/// connection is its own database.
pub async fn memory_pool() -> DbResult<SqlitePool> {
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
