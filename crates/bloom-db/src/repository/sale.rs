//! # Sale Repository
//!
//! The sales ledger: append-only records of completed sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Lifecycle                                   │
//! │                                                                         │
//! │  SaleRequest { flower_id, quantity_sold, customer_name }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleCoordinator::process_sale                                         │
//! │       │  BEGIN IMMEDIATE                                               │
//! │       │  price snapshot + total                                         │
//! │       │  insert_sale()  ◄── THIS MODULE                                │
//! │       │  decrement stock                                                │
//! │       │  COMMIT                                                         │
//! │       ▼                                                                 │
//! │  sales row (never updated, removed only with its flower)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no public API for writing a sale outside the coordinator's unit
//! of work; the repository only reads.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use bloom_core::{NewSale, Sale};

/// Appends a sale through any executor. Returns the new sale id.
pub async fn insert_sale<'e, E>(executor: E, sale: &NewSale) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(
        flower_id = sale.flower_id,
        quantity = sale.quantity_sold,
        total_cents = sale.total_price_cents,
        "Inserting sale"
    );

    let result = sqlx::query(
        r#"
        INSERT INTO sales (
            sale_date, flower_id, quantity_sold,
            unit_price_cents, total_price_cents, customer_name
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(sale.sale_date)
    .bind(sale.flower_id)
    .bind(sale.quantity_sold)
    .bind(sale.unit_price_cents)
    .bind(sale.total_price_cents)
    .bind(&sale.customer_name)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Repository for reading the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, sale_date, flower_id, quantity_sold,
                unit_price_cents, total_price_cents, customer_name
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales, most recent first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, sale_date, flower_id, quantity_sold,
                unit_price_cents, total_price_cents, customer_name
            FROM sales
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales of one flower, most recent first.
    pub async fn list_for_flower(&self, flower_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, sale_date, flower_id, quantity_sold,
                unit_price_cents, total_price_cents, customer_name
            FROM sales
            WHERE flower_id = ?1
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .bind(flower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Number of recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use bloom_core::NewFlower;
    use chrono::{Duration, NaiveDate, Utc};

    async fn setup_with_flower() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let flower = db
            .flowers()
            .insert(&NewFlower {
                name: "Sunflower".to_string(),
                color: "Yellow".to_string(),
                category: None,
                price_cents: 300,
                quantity: 40,
                arrival_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                freshness_days: 7,
                supplier_id: None,
            })
            .await
            .unwrap();
        (db, flower.id)
    }

    fn new_sale(flower_id: i64, quantity: i64, minutes_ago: i64) -> NewSale {
        NewSale {
            sale_date: Utc::now() - Duration::minutes(minutes_ago),
            flower_id,
            quantity_sold: quantity,
            unit_price_cents: 300,
            total_price_cents: 300 * quantity,
            customer_name: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let (db, flower_id) = setup_with_flower().await;

        let older = insert_sale(db.pool(), &new_sale(flower_id, 1, 30)).await.unwrap();
        let newer = insert_sale(db.pool(), &new_sale(flower_id, 2, 5)).await.unwrap();

        let ids: Vec<i64> = db.sales().list_all().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer, older]);

        let stored = db.sales().get_by_id(newer).await.unwrap().unwrap();
        assert_eq!(stored.quantity_sold, 2);
        assert_eq!(stored.total_price_cents, 600);

        assert_eq!(db.sales().list_for_flower(flower_id).await.unwrap().len(), 2);
        assert!(db.sales().list_for_flower(flower_id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sale_for_unknown_flower_rejected() {
        let (db, flower_id) = setup_with_flower().await;

        let result = insert_sale(db.pool(), &new_sale(flower_id + 100, 1, 0)).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_flower_cascades_to_sales() {
        let (db, flower_id) = setup_with_flower().await;
        insert_sale(db.pool(), &new_sale(flower_id, 3, 0)).await.unwrap();
        assert_eq!(db.sales().count().await.unwrap(), 1);

        db.flowers().delete(flower_id).await.unwrap();
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }
}
