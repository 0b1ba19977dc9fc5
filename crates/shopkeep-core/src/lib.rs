//! # shopkeep-core: Pure Business Logic for Shopkeep
//!
//! Everything the counter needs to decide, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopkeep Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Text Menu (apps/cli)                         │   │
//! │  │    Add Product ──► Process Sale ──► Find Bill ──► Report        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopkeep-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  money   │ │ checkout │ │ receipt  │          │   │
//! │  │   │ Product  │ │  Money   │ │ Checkout │ │ render   │          │   │
//! │  │   │ Sale...  │ │          │ │ SaleLine │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐                       │   │
//! │  │   │  bill    │ │  report  │ │validation│                       │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘                       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopkeep-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, SaleRecord, Customer, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`bill`] - Bill number minting
//! - [`checkout`] - Sale planning against a catalog snapshot
//! - [`receipt`] - Plain-text receipt layout
//! - [`report`] - Revenue / expense / profit-loss figures
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shopkeep_core::money::Money;
//!
//! let price: Money = "10.99".parse().unwrap();
//! assert_eq!(price.cents(), 1099);
//! assert_eq!(price.checked_multiply_quantity(3).unwrap().to_string(), "32.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod checkout;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::BillNumber;
pub use checkout::{Checkout, SaleLine, StockDelta};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{render_receipt, StoreInfo};
pub use report::ProfitLossReport;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Maximum number of line items in one sale.
pub const MAX_SALE_LINES: usize = 200;
