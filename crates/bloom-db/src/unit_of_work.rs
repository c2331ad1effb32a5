//! # Unit of Work
//!
//! An explicit transaction scope over one pooled connection.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Unit of Work Lifecycle                             │
//! │                                                                         │
//! │  UnitOfWork::begin(pool)                                               │
//! │       │  acquire connection                                            │
//! │       │  BEGIN IMMEDIATE  ← write lock taken now; other writers wait   │
//! │       ▼                     up to busy_timeout, then DbError::Busy     │
//! │  get_flower / insert_sale / decrement_flower_quantity /                │
//! │  insert_stock_alert        (all on the same connection)                │
//! │       │                                                                 │
//! │       ├──► commit()    COMMIT, connection back to the pool             │
//! │       ├──► rollback()  ROLLBACK, connection back to the pool           │
//! │       └──► dropped     connection closed, SQLite discards everything   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite has no row locks. Taking the database write lock at `BEGIN` is
//! what serializes two sales of the same flower: the second one only reads
//! stock after the first has committed its decrement.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{alert, flower, sale};
use bloom_core::{Flower, NewSale, NewStockAlert};

/// An open `BEGIN IMMEDIATE` transaction.
///
/// Must be finished with [`commit`](UnitOfWork::commit) or
/// [`rollback`](UnitOfWork::rollback). A unit that is dropped instead
/// (early return, cancelled future, panic) closes its connection rather than
/// handing a half-finished transaction back to the pool.
pub struct UnitOfWork {
    conn: Option<PoolConnection<Sqlite>>,
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("open", &self.conn.is_some())
            .finish()
    }
}

impl UnitOfWork {
    /// Acquires a connection and takes the write lock.
    ///
    /// ## Errors
    /// * `DbError::Busy` - another writer held the lock past busy_timeout
    /// * `DbError::PoolExhausted` - no connection became free in time
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let mut conn = pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        debug!("Unit of work started");
        Ok(UnitOfWork { conn: Some(conn) })
    }

    fn conn(&mut self) -> DbResult<&mut SqliteConnection> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| DbError::TransactionFailed("unit of work already finished".to_string()))
    }

    /// Reads a flower inside the transaction.
    pub async fn get_flower(&mut self, id: i64) -> DbResult<Option<Flower>> {
        flower::fetch_flower(self.conn()?, id).await
    }

    /// Guarded relative decrement. Returns rows changed (0 or 1).
    pub async fn decrement_flower_quantity(&mut self, id: i64, amount: i64) -> DbResult<u64> {
        flower::decrement_quantity(self.conn()?, id, amount).await
    }

    /// Appends a sale. Returns its id.
    pub async fn insert_sale(&mut self, new_sale: &NewSale) -> DbResult<i64> {
        sale::insert_sale(self.conn()?, new_sale).await
    }

    /// Appends a stock alert. Returns its id.
    pub async fn insert_stock_alert(&mut self, new_alert: &NewStockAlert) -> DbResult<i64> {
        alert::insert_stock_alert(self.conn()?, new_alert).await
    }

    /// Makes every write of the unit durable.
    pub async fn commit(mut self) -> DbResult<()> {
        self.finish("COMMIT").await?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write of the unit.
    pub async fn rollback(mut self) -> DbResult<()> {
        self.finish("ROLLBACK").await?;
        debug!("Unit of work rolled back");
        Ok(())
    }

    async fn finish(&mut self, statement: &'static str) -> DbResult<()> {
        let mut conn = self
            .conn
            .take()
            .ok_or_else(|| DbError::TransactionFailed("unit of work already finished".to_string()))?;

        if let Err(err) = sqlx::query(statement).execute(&mut *conn).await {
            // The transaction state is unknown; never hand it back to the pool.
            drop(conn.detach());
            return Err(DbError::TransactionFailed(format!("{statement} failed: {err}")));
        }

        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!("Unit of work dropped without commit or rollback, closing its connection");
            drop(conn.detach());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
