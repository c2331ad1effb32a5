//! # Repository Module
//!
//! Database repository implementations for Bloom Florist.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller (UI command, CLI, seed)                                        │
//! │       │                                                                 │
//! │       │  db.flowers().list_with_freshness(today)                       │
//! │       ▼                                                                 │
//! │  FlowerRepository / SupplierRepository / SaleRepository /              │
//! │  AlertRepository           (own a pool handle, one statement each)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Sale path:                                                             │
//! │  SaleCoordinator ─► UnitOfWork ─► fetch_flower / insert_sale /         │
//! │                                   decrement_quantity /                 │
//! │                                   insert_stock_alert                   │
//! │                     (executor-generic, run on the unit's connection)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`FlowerRepository`] - Inventory CRUD, freshness listing, categories
//! - [`SupplierRepository`] - Supplier CRUD
//! - [`SaleRepository`] - Sales ledger queries
//! - [`AlertRepository`] - Stock alert listing and resolution

pub mod alert;
pub mod flower;
pub mod sale;
pub mod supplier;

pub use alert::AlertRepository;
pub use flower::FlowerRepository;
pub use sale::SaleRepository;
pub use supplier::SupplierRepository;
