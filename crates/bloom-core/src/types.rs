//! # Domain Types
//!
//! Core domain types used throughout Bloom Florist.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                         │
//! │  │    Supplier     │◄───────│     Flower      │  supplier_id            │
//! │  │  ─────────────  │ SET    │  ─────────────  │  (weak, nullable)       │
//! │  │  id             │ NULL   │  id             │                         │
//! │  │  name           │        │  price_cents    │                         │
//! │  │  phone / email  │        │  quantity       │◄── only mutable stock   │
//! │  └─────────────────┘        │  arrival_date   │                         │
//! │                             │  freshness_days │                         │
//! │                             └────────┬────────┘                         │
//! │                          CASCADE     │     CASCADE                      │
//! │                    ┌─────────────────┴─────────────────┐                │
//! │                    ▼                                   ▼                │
//! │  ┌─────────────────────────┐         ┌─────────────────────────┐       │
//! │  │          Sale           │         │       StockAlert        │       │
//! │  │  ─────────────────────  │         │  ─────────────────────  │       │
//! │  │  quantity_sold          │         │  LOW_STOCK / WARNING    │       │
//! │  │  unit_price_cents (snap)│         │  remaining_quantity     │       │
//! │  │  total_price_cents      │         │  threshold              │       │
//! │  │  append-only            │         │  resolved / resolved_at │       │
//! │  └─────────────────────────┘         └─────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identities are store-assigned integers. `New*` structs are the inputs
//! for inserts; they carry no id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::freshness::{compute_freshness_on, FreshnessReport};
use crate::money::Money;
use crate::validation::{
    normalize_optional, validate_category, validate_color, validate_customer_name,
    validate_email, validate_flower_name, validate_freshness_days, validate_phone,
    validate_price_cents, validate_sale_quantity, validate_stock_quantity,
    validate_supplier_name, ValidationResult,
};

// =============================================================================
// Flower
// =============================================================================

/// A flower line held in inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Flower {
    pub id: i64,
    pub name: String,
    /// Free-form or palette-selected color name.
    pub color: String,
    /// `None` means uncategorized.
    pub category: Option<String>,
    /// Price per stem in cents.
    pub price_cents: i64,
    /// Stems on hand. Never negative.
    pub quantity: i64,
    /// Day the stock entered inventory.
    #[ts(as = "String")]
    pub arrival_date: NaiveDate,
    /// Shelf-life window in days.
    pub freshness_days: i64,
    pub supplier_id: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Flower {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` stems can be sold from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= self.quantity
    }

    /// Checks a sale of `quantity` stems against current stock.
    ///
    /// ## Returns
    /// * `Ok(remaining)` - stock left after the sale
    /// * `Err(CoreError::InsufficientStock)` - would drive stock negative
    pub fn check_sale(&self, quantity: i64) -> CoreResult<i64> {
        if quantity > self.quantity {
            return Err(CoreError::InsufficientStock {
                flower_id: self.id,
                flower_name: self.name.clone(),
                available: self.quantity,
                requested: quantity,
            });
        }

        Ok(self.quantity - quantity)
    }

    /// Freshness as of `today`.
    pub fn freshness_on(&self, today: NaiveDate) -> FreshnessReport {
        compute_freshness_on(Some(self.arrival_date), self.freshness_days, today)
    }
}

/// Input for adding a flower to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewFlower {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
    #[ts(as = "String")]
    pub arrival_date: NaiveDate,
    pub freshness_days: i64,
    pub supplier_id: Option<i64>,
}

impl NewFlower {
    /// Validates every field and returns a copy with optional text
    /// normalized (blank category becomes `None`, names trimmed).
    pub fn validated(&self) -> ValidationResult<NewFlower> {
        validate_flower_name(&self.name)?;
        validate_color(&self.color)?;
        validate_category(self.category.as_deref())?;
        validate_price_cents(self.price_cents)?;
        validate_stock_quantity(self.quantity)?;
        validate_freshness_days(self.freshness_days)?;

        Ok(NewFlower {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            category: normalize_optional(self.category.as_deref()),
            ..self.clone()
        })
    }
}

/// Manual edit of a flower.
///
/// `quantity` is an absolute set (stock count correction), unlike the
/// relative decrement a sale performs. The arrival date is not editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlowerUpdate {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
    pub freshness_days: i64,
    pub supplier_id: Option<i64>,
}

impl FlowerUpdate {
    /// Validates and normalizes, same rules as [`NewFlower::validated`].
    pub fn validated(&self) -> ValidationResult<FlowerUpdate> {
        validate_flower_name(&self.name)?;
        validate_color(&self.color)?;
        validate_category(self.category.as_deref())?;
        validate_price_cents(self.price_cents)?;
        validate_stock_quantity(self.quantity)?;
        validate_freshness_days(self.freshness_days)?;

        Ok(FlowerUpdate {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            category: normalize_optional(self.category.as_deref()),
            ..self.clone()
        })
    }
}

impl From<&Flower> for FlowerUpdate {
    fn from(flower: &Flower) -> Self {
        FlowerUpdate {
            name: flower.name.clone(),
            color: flower.color.clone(),
            category: flower.category.clone(),
            price_cents: flower.price_cents,
            quantity: flower.quantity,
            freshness_days: flower.freshness_days,
            supplier_id: flower.supplier_id,
        }
    }
}

/// A flower enriched with its freshness for list screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlowerWithFreshness {
    #[serde(flatten)]
    pub flower: Flower,
    pub freshness: FreshnessReport,
}

impl FlowerWithFreshness {
    pub fn new(flower: Flower, today: NaiveDate) -> Self {
        let freshness = flower.freshness_on(today);
        FlowerWithFreshness { flower, freshness }
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewSupplier {
    /// Validates and normalizes; blank phone/email become `None`.
    pub fn validated(&self) -> ValidationResult<NewSupplier> {
        validate_supplier_name(&self.name)?;
        let phone = normalize_optional(self.phone.as_deref());
        let email = normalize_optional(self.email.as_deref());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        if let Some(email) = &email {
            validate_email(email)?;
        }

        Ok(NewSupplier {
            name: self.name.trim().to_string(),
            phone,
            email,
        })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once written.
///
/// Uses the snapshot pattern: `unit_price_cents` freezes the flower price at
/// the moment of sale, so later price edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub flower_id: i64,
    pub quantity_sold: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub customer_name: Option<String>,
}

impl Sale {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// What a caller asks for when selling flowers.
///
/// Deliberately carries no price, total or date: those are derived from the
/// stored flower and the clock inside the sale transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub flower_id: i64,
    pub quantity_sold: i64,
    pub customer_name: Option<String>,
}

impl SaleRequest {
    pub fn new(flower_id: i64, quantity_sold: i64) -> Self {
        SaleRequest {
            flower_id,
            quantity_sold,
            customer_name: None,
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Input checks that need no storage access.
    pub fn validated(&self) -> ValidationResult<SaleRequest> {
        validate_sale_quantity(self.quantity_sold)?;
        validate_customer_name(self.customer_name.as_deref())?;

        Ok(SaleRequest {
            customer_name: normalize_optional(self.customer_name.as_deref()),
            ..self.clone()
        })
    }
}

/// A sale ready to be written: price snapshot and total already computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub sale_date: DateTime<Utc>,
    pub flower_id: i64,
    pub quantity_sold: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub customer_name: Option<String>,
}

impl NewSale {
    /// Prices `request` against the authoritative `flower` record.
    ///
    /// ## Errors
    /// * `InsufficientStock` - not enough stems on hand
    /// * `TotalOverflow` - total would not fit in i64 cents
    pub fn price(flower: &Flower, request: &SaleRequest, at: DateTime<Utc>) -> CoreResult<NewSale> {
        flower.check_sale(request.quantity_sold)?;

        let total = flower
            .price()
            .multiply_quantity(request.quantity_sold)
            .ok_or(CoreError::TotalOverflow {
                quantity: request.quantity_sold,
                unit_price_cents: flower.price_cents,
            })?;

        Ok(NewSale {
            sale_date: at,
            flower_id: flower.id,
            quantity_sold: request.quantity_sold,
            unit_price_cents: flower.price_cents,
            total_price_cents: total.cents(),
            customer_name: request.customer_name.clone(),
        })
    }

    /// Attaches the store-assigned id.
    pub fn into_sale(self, id: i64) -> Sale {
        Sale {
            id,
            sale_date: self.sale_date,
            flower_id: self.flower_id,
            quantity_sold: self.quantity_sold,
            unit_price_cents: self.unit_price_cents,
            total_price_cents: self.total_price_cents,
            customer_name: self.customer_name,
        }
    }
}

// =============================================================================
// Stock Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::LowStock => f.write_str("LOW_STOCK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Warning,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => f.write_str("WARNING"),
        }
    }
}

/// A generated stock warning.
///
/// `message` is the rendered text; `remaining_quantity` and `threshold`
/// carry the same facts in structured form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockAlert {
    pub id: i64,
    pub flower_id: i64,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub remaining_quantity: i64,
    pub threshold: i64,
    #[ts(as = "String")]
    pub generated_date: DateTime<Utc>,
    pub resolved: bool,
    #[ts(as = "Option<String>")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A stock alert ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockAlert {
    pub flower_id: i64,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub remaining_quantity: i64,
    pub threshold: i64,
    pub generated_date: DateTime<Utc>,
}

impl NewStockAlert {
    /// Builds a `LOW_STOCK` warning when `remaining` is below `threshold`.
    ///
    /// ## Example
    /// ```rust
    /// use bloom_core::NewStockAlert;
    /// use chrono::Utc;
    ///
    /// let alert = NewStockAlert::low_stock(1, "Tulip", 4, 10, Utc::now()).unwrap();
    /// assert_eq!(alert.message, "Low stock for Tulip. Only 4 remaining.");
    ///
    /// assert!(NewStockAlert::low_stock(1, "Tulip", 10, 10, Utc::now()).is_none());
    /// ```
    pub fn low_stock(
        flower_id: i64,
        flower_name: &str,
        remaining: i64,
        threshold: i64,
        at: DateTime<Utc>,
    ) -> Option<NewStockAlert> {
        if !is_low_stock(remaining, threshold) {
            return None;
        }

        Some(NewStockAlert {
            flower_id,
            alert_type: AlertType::LowStock,
            severity: AlertSeverity::Warning,
            message: format!("Low stock for {}. Only {} remaining.", flower_name, remaining),
            remaining_quantity: remaining,
            threshold,
            generated_date: at,
        })
    }
}

/// Stock strictly below the threshold is low.
#[inline]
pub fn is_low_stock(remaining: i64, threshold: i64) -> bool {
    remaining < threshold
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rose(quantity: i64) -> Flower {
        let now = Utc::now();
        Flower {
            id: 1,
            name: "Red Rose".to_string(),
            color: "Red".to_string(),
            category: Some("Roses".to_string()),
            price_cents: 350,
            quantity,
            arrival_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            freshness_days: 10,
            supplier_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_check_sale_returns_remaining() {
        assert_eq!(rose(20).check_sale(5).unwrap(), 15);
        assert_eq!(rose(5).check_sale(5).unwrap(), 0);
    }

    #[test]
    fn test_check_sale_insufficient_carries_context() {
        let err = rose(3).check_sale(5).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                flower_id,
                flower_name,
                available,
                requested,
            } => {
                assert_eq!(flower_id, 1);
                assert_eq!(flower_name, "Red Rose");
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_can_sell() {
        let flower = rose(4);
        assert!(flower.can_sell(4));
        assert!(!flower.can_sell(5));
        assert!(!flower.can_sell(0));
    }

    #[test]
    fn test_new_sale_snapshots_price_and_total() {
        let at = Utc::now();
        let request = SaleRequest::new(1, 4).with_customer("Ada");
        let sale = NewSale::price(&rose(20), &request, at).unwrap();

        assert_eq!(sale.unit_price_cents, 350);
        assert_eq!(sale.total_price_cents, 1400);
        assert_eq!(sale.sale_date, at);
        assert_eq!(sale.customer_name.as_deref(), Some("Ada"));

        let stored = sale.into_sale(42);
        assert_eq!(stored.id, 42);
        assert_eq!(stored.total_price(), Money::from_cents(1400));
    }

    #[test]
    fn test_new_sale_overflow_is_rejected() {
        let mut flower = rose(i64::MAX);
        flower.price_cents = i64::MAX / 2;
        let request = SaleRequest::new(1, 3);
        assert!(matches!(
            NewSale::price(&flower, &request, Utc::now()),
            Err(CoreError::TotalOverflow {
                quantity: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_low_stock_alert_only_below_threshold() {
        let at = Utc::now();
        assert!(NewStockAlert::low_stock(1, "Red Rose", 10, 10, at).is_none());

        let alert = NewStockAlert::low_stock(1, "Red Rose", 9, 10, at).unwrap();
        assert_eq!(alert.alert_type, AlertType::LowStock);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.remaining_quantity, 9);
        assert_eq!(alert.threshold, 10);
        assert_eq!(alert.message, "Low stock for Red Rose. Only 9 remaining.");
    }

    #[test]
    fn test_sale_request_validation() {
        assert!(SaleRequest::new(1, 0).validated().is_err());
        assert!(SaleRequest::new(1, -2).validated().is_err());

        let cleaned = SaleRequest::new(1, 2).with_customer("   ").validated().unwrap();
        assert_eq!(cleaned.customer_name, None);
    }

    #[test]
    fn test_new_flower_normalizes_blank_category() {
        let input = NewFlower {
            name: "  Tulip ".to_string(),
            color: "Yellow".to_string(),
            category: Some("  ".to_string()),
            price_cents: 120,
            quantity: 30,
            arrival_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            freshness_days: 7,
            supplier_id: None,
        };
        let clean = input.validated().unwrap();
        assert_eq!(clean.name, "Tulip");
        assert_eq!(clean.category, None);
    }

    #[test]
    fn test_new_flower_rejects_zero_shelf_life() {
        let input = NewFlower {
            name: "Tulip".to_string(),
            color: String::new(),
            category: None,
            price_cents: 120,
            quantity: 30,
            arrival_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            freshness_days: 0,
            supplier_id: None,
        };
        assert!(input.validated().is_err());
    }

    #[test]
    fn test_flower_with_freshness_flattens() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 6).unwrap();
        let enriched = FlowerWithFreshness::new(rose(12), today);
        assert_eq!(enriched.freshness.percentage, 50);

        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["name"], "Red Rose");
        assert_eq!(json["freshness"]["status"], "ACCEPTABLE");
    }

    #[test]
    fn test_alert_enums_serialize_screaming_case() {
        assert_eq!(serde_json::to_string(&AlertType::LowStock).unwrap(), "\"LOW_STOCK\"");
        assert_eq!(serde_json::to_string(&AlertSeverity::Warning).unwrap(), "\"WARNING\"");
        assert_eq!(AlertType::LowStock.to_string(), "LOW_STOCK");
    }

    #[test]
    fn test_supplier_blank_contact_becomes_none() {
        let input = NewSupplier {
            name: "Dutch Growers".to_string(),
            phone: Some(String::new()),
            email: Some("  ".to_string()),
        };
        let clean = input.validated().unwrap();
        assert_eq!(clean.phone, None);
        assert_eq!(clean.email, None);
    }
}
