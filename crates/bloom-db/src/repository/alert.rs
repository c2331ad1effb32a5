//! # Stock Alert Repository
//!
//! Low stock warnings raised by sales, and their manual resolution.
//!
//! Alerts are written only from inside the sale unit of work (see
//! [`insert_stock_alert`]). The repository lists them and marks them
//! resolved once someone has reordered.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bloom_core::{NewStockAlert, StockAlert};

/// Appends a stock alert through any executor. Returns the new alert id.
pub async fn insert_stock_alert<'e, E>(executor: E, alert: &NewStockAlert) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(
        flower_id = alert.flower_id,
        remaining = alert.remaining_quantity,
        threshold = alert.threshold,
        "Inserting stock alert"
    );

    let result = sqlx::query(
        r#"
        INSERT INTO stock_alerts (
            flower_id, alert_type, severity, message,
            remaining_quantity, threshold, generated_date, resolved
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)
        "#,
    )
    .bind(alert.flower_id)
    .bind(alert.alert_type)
    .bind(alert.severity)
    .bind(&alert.message)
    .bind(alert.remaining_quantity)
    .bind(alert.threshold)
    .bind(alert.generated_date)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Repository for stock alert database operations.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: SqlitePool,
}

impl AlertRepository {
    /// Creates a new AlertRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AlertRepository { pool }
    }

    /// Open alerts, newest first.
    pub async fn list_unresolved(&self) -> DbResult<Vec<StockAlert>> {
        let alerts = sqlx::query_as::<_, StockAlert>(
            r#"
            SELECT
                id, flower_id, alert_type, severity, message,
                remaining_quantity, threshold, generated_date, resolved, resolved_at
            FROM stock_alerts
            WHERE resolved = 0
            ORDER BY generated_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Every alert ever raised for one flower, newest first.
    pub async fn list_for_flower(&self, flower_id: i64) -> DbResult<Vec<StockAlert>> {
        let alerts = sqlx::query_as::<_, StockAlert>(
            r#"
            SELECT
                id, flower_id, alert_type, severity, message,
                remaining_quantity, threshold, generated_date, resolved, resolved_at
            FROM stock_alerts
            WHERE flower_id = ?1
            ORDER BY generated_date DESC, id DESC
            "#,
        )
        .bind(flower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Marks an open alert resolved.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such alert, or it was already resolved
    pub async fn resolve(&self, id: i64) -> DbResult<()> {
        debug!(id, "Resolving stock alert");

        let result = sqlx::query(
            r#"
            UPDATE stock_alerts
            SET resolved = 1, resolved_at = ?2
            WHERE id = ?1 AND resolved = 0
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open stock alert", id));
        }

        Ok(())
    }

    /// Total number of alerts, resolved or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_alerts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bloom_core::{AlertSeverity, AlertType, NewFlower};
    use chrono::NaiveDate;

    async fn setup_with_flower() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let flower = db
            .flowers()
            .insert(&NewFlower {
                name: "Orchid".to_string(),
                color: "White".to_string(),
                category: Some("Potted".to_string()),
                price_cents: 1_500,
                quantity: 4,
                arrival_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                freshness_days: 21,
                supplier_id: None,
            })
            .await
            .unwrap();
        (db, flower.id)
    }

    #[tokio::test]
    async fn test_insert_list_and_resolve() {
        let (db, flower_id) = setup_with_flower().await;
        let alert = NewStockAlert::low_stock(flower_id, "Orchid", 4, 10, Utc::now()).unwrap();

        let id = insert_stock_alert(db.pool(), &alert).await.unwrap();

        let open = db.alerts().list_unresolved().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, id);
        assert_eq!(open[0].alert_type, AlertType::LowStock);
        assert_eq!(open[0].severity, AlertSeverity::Warning);
        assert_eq!(open[0].message, "Low stock for Orchid. Only 4 remaining.");
        assert_eq!(open[0].remaining_quantity, 4);
        assert_eq!(open[0].threshold, 10);
        assert!(!open[0].resolved);
        assert!(open[0].resolved_at.is_none());

        db.alerts().resolve(id).await.unwrap();
        assert!(db.alerts().list_unresolved().await.unwrap().is_empty());

        let history = db.alerts().list_for_flower(flower_id).await.unwrap();
        assert!(history[0].resolved);
        assert!(history[0].resolved_at.is_some());

        // Already resolved
        assert!(matches!(
            db.alerts().resolve(id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_deleting_flower_cascades_to_alerts() {
        let (db, flower_id) = setup_with_flower().await;
        let alert = NewStockAlert::low_stock(flower_id, "Orchid", 4, 10, Utc::now()).unwrap();
        insert_stock_alert(db.pool(), &alert).await.unwrap();

        db.flowers().delete(flower_id).await.unwrap();
        assert_eq!(db.alerts().count().await.unwrap(), 0);
    }
}
