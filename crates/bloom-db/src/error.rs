//! # Database Error Types
//!
//! Error types for database operations and for the sale transaction.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleError ← process_sale's taxonomy                                   │
//! │    ├── Validation         (before any I/O, not retried)                │
//! │    ├── NotFound           (not retried)                                │
//! │    ├── InsufficientStock  (not retried, carries available qty)         │
//! │    └── Transient(DbError) (caller may retry the whole sale)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bloom_core::{CoreError, ValidationError};
use thiserror::Error;

/// SQLite primary result codes that mean "someone else holds the lock".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Flower referencing a non-existent supplier_id
    /// - Sale or alert referencing a non-existent flower_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. negative quantity).
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// The database is locked by another writer and busy_timeout expired.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit/rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Input rejected before reaching SQLite.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Errors caused by contention or resource exhaustion rather than by
    /// the request itself. Retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::Busy(_)
                | DbError::PoolExhausted
                | DbError::ConnectionFailed(_)
                | DbError::TransactionFailed(_)
        )
    }
}

fn is_lock_error(db_err: &dyn sqlx::error::DatabaseError) -> bool {
    let code_is_busy = db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false);

    code_is_busy || db_err.message().contains("database is locked")
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → lock / constraint type from code and message
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if is_lock_error(&*db_err) {
                    DbError::Busy(msg.to_string())
                } else if msg.contains("UNIQUE constraint failed") {
                    // "UNIQUE constraint failed: <table>.<column>"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sale Error
// =============================================================================

/// Why a sale was not recorded.
///
/// Every variant leaves the database untouched: no sale row, no stock change,
/// no alert.
#[derive(Debug, Error)]
pub enum SaleError {
    /// Malformed request, rejected before the transaction opened.
    #[error("Invalid sale: {0}")]
    Validation(#[from] ValidationError),

    /// The flower does not exist.
    #[error("Flower not found: {flower_id}")]
    NotFound { flower_id: i64 },

    /// Selling would drive stock negative.
    #[error("Insufficient stock for {flower_name}: available {available}, requested {requested}")]
    InsufficientStock {
        flower_id: i64,
        flower_name: String,
        available: i64,
        requested: i64,
    },

    /// Storage failed (lock timeout, I/O, ...). The whole sale may be retried.
    #[error("Sale could not be recorded, please retry: {0}")]
    Transient(#[source] DbError),
}

impl SaleError {
    /// Only storage failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SaleError::Transient(_))
    }
}

impl From<DbError> for SaleError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(v) => SaleError::Validation(v),
            other => SaleError::Transient(other),
        }
    }
}

impl From<CoreError> for SaleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                flower_id,
                flower_name,
                available,
                requested,
            } => SaleError::InsufficientStock {
                flower_id,
                flower_name,
                available,
                requested,
            },
            CoreError::TotalOverflow {
                quantity,
                unit_price_cents,
            } => SaleError::Validation(ValidationError::InvalidFormat {
                field: "total_price_cents".to_string(),
                reason: format!("{quantity} x {unit_price_cents} cents overflows"),
            }),
            CoreError::Validation(v) => SaleError::Validation(v),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(DbError::Busy("database is locked".into()).is_transient());
        assert!(DbError::PoolExhausted.is_transient());
        assert!(!DbError::not_found("Flower", 3).is_transient());
        assert!(!DbError::CheckViolation { message: "x".into() }.is_transient());
    }

    #[test]
    fn test_sale_error_retryable_only_for_storage() {
        assert!(SaleError::Transient(DbError::PoolExhausted).is_retryable());
        assert!(!SaleError::NotFound { flower_id: 1 }.is_retryable());
        assert!(!SaleError::Validation(ValidationError::required("x")).is_retryable());
    }

    #[test]
    fn test_core_insufficient_stock_maps_with_context() {
        let err: SaleError = CoreError::InsufficientStock {
            flower_id: 4,
            flower_name: "Peony".to_string(),
            available: 2,
            requested: 6,
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Insufficient stock for Peony: available 2, requested 6"
        );
    }

    #[test]
    fn test_total_overflow_is_validation_naming_the_total() {
        let err: SaleError = CoreError::TotalOverflow {
            quantity: 5,
            unit_price_cents: 7,
        }
        .into();
        assert!(!err.is_retryable());
        match err {
            SaleError::Validation(v) => {
                let message = v.to_string();
                assert!(message.contains("total_price_cents"));
                assert!(message.contains("5 x 7 cents overflows"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_db_validation_stays_validation() {
        let err: SaleError = DbError::from(ValidationError::required("name")).into();
        assert!(matches!(err, SaleError::Validation(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(DbError::not_found("Supplier", 9).to_string(), "Supplier not found: 9");
    }
}
