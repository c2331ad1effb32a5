//! # bloom-core: Pure Business Logic for Bloom Florist
//!
//! This crate is the domain heart of Bloom Florist. It contains the flower,
//! supplier, sale and alert types plus the freshness engine, all as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bloom Florist Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI / CLI / API (external)                       │   │
//! │  │    Inventory list ──► Add sale ──► Suppliers ──► Alerts         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bloom-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ freshness │  │ validation│  │   │
//! │  │   │  Flower   │  │   Money   │  │  percent  │  │   rules   │  │   │
//! │  │   │   Sale    │  │  totals   │  │  status   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bloom-db (Database Layer)                    │   │
//! │  │     SQLite stores, unit of work, sale transaction coordinator   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Flower, Supplier, Sale, StockAlert)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`freshness`] - Perishability percentage and status
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bloom_core::freshness::{compute_freshness_on, FreshnessStatus};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
//! let arrival = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
//!
//! // Five of ten shelf-life days used up
//! let report = compute_freshness_on(Some(arrival), 10, today);
//! assert_eq!(report.percentage, 50);
//! assert_eq!(report.status, FreshnessStatus::Acceptable);
//! assert_eq!(report.label, "Acceptable (50%)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod freshness;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use freshness::{compute_freshness, FreshnessReport, FreshnessStatus};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a sale raises a `LOW_STOCK` alert.
///
/// Deployments override this through configuration; this is only the value
/// used when nothing is configured.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;
