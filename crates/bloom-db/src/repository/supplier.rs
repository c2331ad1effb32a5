//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! Deleting a supplier never deletes flowers: the schema declares
//! `flowers.supplier_id ... ON DELETE SET NULL`, so stock bought from a
//! removed supplier simply loses its supplier reference.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bloom_core::{NewSupplier, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists every supplier, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM suppliers
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Creates a supplier.
    ///
    /// ## Returns
    /// * `Ok(Supplier)` - Stored supplier with its assigned id
    /// * `Err(DbError::Validation)` - Blank name, malformed phone or email
    pub async fn insert(&self, supplier: &NewSupplier) -> DbResult<Supplier> {
        let supplier = supplier.validated()?;
        debug!(name = %supplier.name, "Inserting supplier");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, phone, email, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Supplier {
            id: result.last_insert_rowid(),
            name: supplier.name,
            phone: supplier.phone,
            email: supplier.email,
            created_at: now,
        })
    }

    /// Replaces a supplier's name and contact details.
    pub async fn update(&self, id: i64, supplier: &NewSupplier) -> DbResult<Supplier> {
        let supplier = supplier.validated()?;
        debug!(id, name = %supplier.name, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                phone = ?3,
                email = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Deletes a supplier; its flowers keep existing with no supplier.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn supplier(name: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            phone: Some("+31 20 555 0199".to_string()),
            email: Some("orders@example.nl".to_string()),
        }
    }

    #[tokio::test]
    async fn test_supplier_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let stored = repo.insert(&supplier("Holland Blooms")).await.unwrap();
        repo.insert(&supplier("Alpine Ferns")).await.unwrap();

        let names: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alpine Ferns", "Holland Blooms"]);

        let mut change = supplier("Holland Blooms BV");
        change.email = Some(String::new());
        let updated = repo.update(stored.id, &change).await.unwrap();
        assert_eq!(updated.name, "Holland Blooms BV");
        assert_eq!(updated.email, None);

        repo.delete(stored.id).await.unwrap();
        assert!(repo.get_by_id(stored.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(stored.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_supplier_validation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut bad = supplier("Holland Blooms");
        bad.email = Some("not-an-email".to_string());

        assert!(matches!(
            db.suppliers().insert(&bad).await,
            Err(DbError::Validation(_))
        ));
        assert!(db.suppliers().list_all().await.unwrap().is_empty());
    }
}
