//! # Sale Transaction Coordinator
//!
//! Records one sale atomically: stock check, ledger entry, stock decrement
//! and low stock alert either all happen or none do.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_sale(request)                                │
//! │                                                                         │
//! │  request.validated()           ── bad input ──► SaleError::Validation  │
//! │       │  (no I/O yet)                                                   │
//! │       ▼                                                                 │
//! │  UnitOfWork::begin             ── lock timeout ► SaleError::Transient  │
//! │       │  BEGIN IMMEDIATE                                                │
//! │       ▼                                                                 │
//! │  get_flower(id)                ── missing ─────► SaleError::NotFound   │
//! │       ▼                                                                 │
//! │  NewSale::price                ── qty > stock ─► InsufficientStock     │
//! │       │  unit price snapshot, total, sale_date = now                    │
//! │       ▼                                                                 │
//! │  insert_sale                                                            │
//! │       ▼                                                                 │
//! │  decrement_flower_quantity     ── 0 rows ──────► InsufficientStock     │
//! │       │  quantity = quantity - n WHERE quantity >= n                    │
//! │       ▼                                                                 │
//! │  remaining < threshold ?  ──► insert_stock_alert (LOW_STOCK/WARNING)   │
//! │       ▼                                                                 │
//! │  COMMIT ──► Sale                                                        │
//! │                                                                         │
//! │  Any error after BEGIN: ROLLBACK, nothing written.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{info, warn};

use crate::config::BloomConfig;
use crate::error::SaleError;
use crate::pool::Database;
use crate::unit_of_work::UnitOfWork;
use bloom_core::{NewSale, NewStockAlert, Sale, SaleRequest, DEFAULT_LOW_STOCK_THRESHOLD};

/// Processes sales against the inventory.
///
/// ## Usage
/// ```rust,ignore
/// let coordinator = SaleCoordinator::new(db.clone(), config.low_stock_threshold());
///
/// match coordinator.process_sale(SaleRequest::new(flower_id, 3)).await {
///     Ok(sale) => println!("Sold for {}", sale.total_price()),
///     Err(SaleError::InsufficientStock { available, .. }) => {
///         println!("Only {available} left")
///     }
///     Err(e) if e.is_retryable() => { /* try again */ }
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SaleCoordinator {
    db: Database,
    low_stock_threshold: i64,
}

impl SaleCoordinator {
    /// Creates a coordinator. A threshold of zero never raises alerts.
    pub fn new(db: Database, low_stock_threshold: i64) -> Self {
        SaleCoordinator {
            db,
            low_stock_threshold,
        }
    }

    /// Creates a coordinator with the threshold from configuration.
    pub fn from_config(db: Database, config: &BloomConfig) -> Self {
        Self::new(db, config.low_stock_threshold())
    }

    /// Creates a coordinator with the built-in default threshold.
    pub fn with_default_threshold(db: Database) -> Self {
        Self::new(db, DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Records a sale.
    ///
    /// Price, total and date come from the stored flower and the clock;
    /// the request cannot supply them.
    ///
    /// ## Errors
    /// * `Validation` - quantity not positive (or too large), customer name too long
    /// * `NotFound` - no flower with `request.flower_id`
    /// * `InsufficientStock` - more stems requested than on hand
    /// * `Transient` - storage failure; nothing was written, the sale may be retried
    pub async fn process_sale(&self, request: SaleRequest) -> Result<Sale, SaleError> {
        let request = match request.validated() {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    flower_id = request.flower_id,
                    quantity = request.quantity_sold,
                    error = %err,
                    "Sale rejected"
                );
                return Err(err.into());
            }
        };

        let mut uow = self.db.begin().await?;

        match self.record(&mut uow, &request).await {
            Ok(sale) => {
                uow.commit().await?;
                info!(
                    sale_id = sale.id,
                    flower_id = sale.flower_id,
                    quantity = sale.quantity_sold,
                    total_cents = sale.total_price_cents,
                    "Sale recorded"
                );
                Ok(sale)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed sale did not complete");
                }
                warn!(
                    flower_id = request.flower_id,
                    quantity = request.quantity_sold,
                    error = %err,
                    "Sale rejected"
                );
                Err(err)
            }
        }
    }

    async fn record(&self, uow: &mut UnitOfWork, request: &SaleRequest) -> Result<Sale, SaleError> {
        let flower = uow
            .get_flower(request.flower_id)
            .await?
            .ok_or(SaleError::NotFound {
                flower_id: request.flower_id,
            })?;

        // One timestamp for the sale and any alert it raises
        let now = Utc::now();

        let new_sale = NewSale::price(&flower, request, now)?;
        let remaining = flower.quantity - new_sale.quantity_sold;

        let sale_id = uow.insert_sale(&new_sale).await?;

        if uow
            .decrement_flower_quantity(flower.id, new_sale.quantity_sold)
            .await?
            == 0
        {
            return Err(SaleError::InsufficientStock {
                flower_id: flower.id,
                flower_name: flower.name.clone(),
                available: flower.quantity,
                requested: new_sale.quantity_sold,
            });
        }

        if let Some(alert) =
            NewStockAlert::low_stock(flower.id, &flower.name, remaining, self.low_stock_threshold, now)
        {
            uow.insert_stock_alert(&alert).await?;
            info!(
                flower_id = flower.id,
                remaining,
                threshold = self.low_stock_threshold,
                "Low stock alert raised"
            );
        }

        Ok(new_sale.into_sale(sale_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
