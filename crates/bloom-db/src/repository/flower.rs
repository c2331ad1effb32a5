//! # Flower Repository
//!
//! The Inventory Store: database operations for flowers.
//!
//! ## Key Operations
//! - CRUD operations
//! - Freshness-enriched listing
//! - Category housekeeping
//! - Guarded stock decrement (sale path)
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: Absolute update from a value read earlier                   │
//! │     UPDATE flowers SET quantity = 7 WHERE id = ?                       │
//! │     (two sales reading 10 both write 7: one sale lost)                 │
//! │                                                                         │
//! │  ✅ CORRECT: Relative update with a guard                              │
//! │     UPDATE flowers SET quantity = quantity - 3                         │
//! │     WHERE id = ? AND quantity >= 3                                     │
//! │                                                                         │
//! │  rows_affected == 0  →  not enough stock (or no such flower)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Manual edits through [`FlowerRepository::update`] still set an absolute
//! quantity: that is a stock count correction, not a sale.

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bloom_core::{Flower, FlowerUpdate, FlowerWithFreshness, NewFlower};

// =============================================================================
// Executor-generic operations (usable inside a unit of work)
// =============================================================================

/// Loads one flower through any executor (pool or open transaction).
pub async fn fetch_flower<'e, E>(executor: E, id: i64) -> DbResult<Option<Flower>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let flower = sqlx::query_as::<_, Flower>(
        r#"
        SELECT
            id, name, color, category, price_cents, quantity,
            arrival_date, freshness_days, supplier_id, created_at, updated_at
        FROM flowers
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(flower)
}

/// Subtracts `amount` from a flower's stock if at least `amount` remains.
///
/// ## Returns
/// Number of rows changed: `1` on success, `0` when the flower is missing or
/// the guard `quantity >= amount` failed.
pub async fn decrement_quantity<'e, E>(executor: E, id: i64, amount: i64) -> DbResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(flower_id = id, amount, "Decrementing stock");

    let result = sqlx::query(
        r#"
        UPDATE flowers
        SET
            quantity = quantity - ?2,
            updated_at = ?3
        WHERE id = ?1 AND quantity >= ?2
        "#,
    )
    .bind(id)
    .bind(amount)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for flower (inventory) database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.flowers();
///
/// let tulip = repo.insert(&new_tulip).await?;
/// let listing = repo.list_with_freshness(freshness::today()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FlowerRepository {
    pool: SqlitePool,
}

impl FlowerRepository {
    /// Creates a new FlowerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FlowerRepository { pool }
    }

    /// Lists every flower, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Flower>> {
        let flowers = sqlx::query_as::<_, Flower>(
            r#"
            SELECT
                id, name, color, category, price_cents, quantity,
                arrival_date, freshness_days, supplier_id, created_at, updated_at
            FROM flowers
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = flowers.len(), "Listed flowers");
        Ok(flowers)
    }

    /// Gets a flower by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Flower))` - Flower found
    /// * `Ok(None)` - Flower not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Flower>> {
        fetch_flower(&self.pool, id).await
    }

    /// Lists every flower with its freshness as of `today`.
    pub async fn list_with_freshness(&self, today: NaiveDate) -> DbResult<Vec<FlowerWithFreshness>> {
        let flowers = self.list_all().await?;

        Ok(flowers
            .into_iter()
            .map(|flower| FlowerWithFreshness::new(flower, today))
            .collect())
    }

    /// Adds a flower to inventory.
    ///
    /// ## Returns
    /// * `Ok(Flower)` - Stored flower with its assigned id
    /// * `Err(DbError::Validation)` - Input rejected
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown supplier_id
    pub async fn insert(&self, flower: &NewFlower) -> DbResult<Flower> {
        let flower = flower.validated()?;
        debug!(name = %flower.name, quantity = flower.quantity, "Inserting flower");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO flowers (
                name, color, category, price_cents, quantity,
                arrival_date, freshness_days, supplier_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&flower.name)
        .bind(&flower.color)
        .bind(&flower.category)
        .bind(flower.price_cents)
        .bind(flower.quantity)
        .bind(flower.arrival_date)
        .bind(flower.freshness_days)
        .bind(flower.supplier_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Flower {
            id: result.last_insert_rowid(),
            name: flower.name,
            color: flower.color,
            category: flower.category,
            price_cents: flower.price_cents,
            quantity: flower.quantity,
            arrival_date: flower.arrival_date,
            freshness_days: flower.freshness_days,
            supplier_id: flower.supplier_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates an existing flower. The arrival date is left untouched.
    ///
    /// ## Returns
    /// * `Ok(Flower)` - The updated record
    /// * `Err(DbError::NotFound)` - Flower doesn't exist
    pub async fn update(&self, id: i64, update: &FlowerUpdate) -> DbResult<Flower> {
        let update = update.validated()?;
        debug!(id, quantity = update.quantity, "Updating flower");

        let result = sqlx::query(
            r#"
            UPDATE flowers SET
                name = ?2,
                color = ?3,
                category = ?4,
                price_cents = ?5,
                quantity = ?6,
                freshness_days = ?7,
                supplier_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.color)
        .bind(&update.category)
        .bind(update.price_cents)
        .bind(update.quantity)
        .bind(update.freshness_days)
        .bind(update.supplier_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Flower", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Flower", id))
    }

    /// Deletes a flower. Its sales and stock alerts go with it (cascade).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting flower");

        let result = sqlx::query("DELETE FROM flowers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Flower", id));
        }

        Ok(())
    }

    /// Distinct non-empty categories in use, alphabetically.
    pub async fn unique_categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT category
            FROM flowers
            WHERE category IS NOT NULL AND trim(category) != ''
            ORDER BY category COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Removes `category` from every flower that carries it.
    ///
    /// ## Returns
    /// Number of flowers that became uncategorized.
    pub async fn clear_category(&self, category: &str) -> DbResult<u64> {
        debug!(category = %category, "Clearing category");

        let result = sqlx::query(
            r#"
            UPDATE flowers
            SET category = NULL, updated_at = ?2
            WHERE category = ?1
            "#,
        )
        .bind(category)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Number of flower lines in inventory.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flowers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
