//! # bloom-db: Database Layer for Bloom Florist
//!
//! This crate provides storage and the sale transaction for Bloom Florist.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bloom Florist Data Flow                            │
//! │                                                                         │
//! │  Caller (UI command, CLI, seed)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bloom-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐    │   │
//! │  │   │SaleCoordinator│──►│  UnitOfWork   │   │  Repositories │    │   │
//! │  │   │ process_sale  │   │BEGIN IMMEDIATE│   │ flowers       │    │   │
//! │  │   └───────────────┘   └───────┬───────┘   │ suppliers     │    │   │
//! │  │                               │           │ sales, alerts │    │   │
//! │  │   ┌───────────────┐   ┌───────▼───────┐   └───────┬───────┘    │   │
//! │  │   │  BloomConfig  │──►│   Database    │◄──────────┘            │   │
//! │  │   │  bloom.toml   │   │   (pool.rs)   │   Migrations           │   │
//! │  │   │  BLOOM_* env  │   │  SqlitePool   │   001_initial_schema   │   │
//! │  │   └───────────────┘   └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and sale error types
//! - [`config`] - Runtime configuration (TOML + environment)
//! - [`repository`] - Inventory, supplier, sales and alert stores
//! - [`unit_of_work`] - Explicit transaction scope
//! - [`coordinator`] - The sale transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bloom_db::{BloomConfig, Database, SaleCoordinator};
//! use bloom_core::SaleRequest;
//!
//! let config = BloomConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let coordinator = SaleCoordinator::from_config(db.clone(), &config);
//! let sale = coordinator.process_sale(SaleRequest::new(flower_id, 3)).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod coordinator;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::BloomConfig;
pub use coordinator::SaleCoordinator;
pub use error::{DbError, DbResult, SaleError};
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;

// Repository re-exports for convenience
pub use repository::{AlertRepository, FlowerRepository, SaleRepository, SupplierRepository};
