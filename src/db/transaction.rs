//! Write transactions that take the SQLite write lock up front.
//!
//! A deferred `BEGIN` only asks for the write lock at the first write, after
//! the reads that decide what to write. Two connections racing to upgrade
//! get `SQLITE_BUSY` without the busy timeout ever being consulted.
//! `BEGIN IMMEDIATE` queues writers on the busy timeout instead.

use std::ops::{Deref, DerefMut};

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{error, warn};

use super::DbResult;

const IN_USE: &str = "write transaction is only reachable before commit";

/// An open `BEGIN IMMEDIATE` transaction on a pooled connection.
///
/// Dropping it without [`WriteTransaction::commit`] rolls back before the
/// connection goes back to the pool.
pub struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTransaction {
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self { conn: Some(conn) })
    }

    pub async fn commit(mut self) -> DbResult<()> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };

        if let Err(err) = sqlx::query("COMMIT").execute(&mut *conn).await {
            // A failed COMMIT leaves the transaction open.
            if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                error!(error = %rollback, "Rollback after failed commit failed");
                drop(conn.detach());
            }
            return Err(err.into());
        }
        Ok(())
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        self.conn.as_deref().expect(IN_USE)
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        self.conn.as_deref_mut().expect(IN_USE)
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                        warn!(error = %err, "Rollback failed, closing connection");
                        drop(conn.detach());
                    }
                });
            }
            // Closing the connection discards the open transaction.
            Err(_) => drop(conn.detach()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{countries, memory_pool};
    use crate::models::Country;

    fn country(name: &str) -> Country {
        Country {
            country: name.to_string(),
            timezone: None,
            currency: None,
        }
    }

    #[tokio::test]
    async fn test_commit_persists() {
        let pool = memory_pool().await.unwrap();

        let mut tx = WriteTransaction::begin(&pool).await.unwrap();
        countries::insert(&mut tx, &country("Sweden")).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(countries::exists(&mut conn, "Sweden").await.unwrap());
    }

    #[tokio::test]
    async fn test_drop_rolls_back_and_releases_connection() {
        let pool = memory_pool().await.unwrap();

        {
            let mut tx = WriteTransaction::begin(&pool).await.unwrap();
            countries::insert(&mut tx, &country("Norway")).await.unwrap();
        }

        // The single pooled connection must come back usable, outside any transaction.
        let mut tx = WriteTransaction::begin(&pool).await.unwrap();
        assert!(!countries::exists(&mut tx, "Norway").await.unwrap());
        tx.commit().await.unwrap();
    }
}
