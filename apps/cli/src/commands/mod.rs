//! # Commands Module
//!
//! One async function per menu operation. Commands take typed arguments and
//! return typed results; prompting and printing live in [`crate::menu`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Add / update / view inventory
//! ├── sale.rs      ◄─── Begin and complete a sale
//! ├── bill.rs      ◄─── Find bill, update payment status
//! ├── report.rs    ◄─── Revenue / expense / profit-loss
//! └── customer.rs  ◄─── Add / find customer
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu.rs                                                                │
//! │    prompt "Enter product name: " → "Rice"                               │
//! │    prompt "Enter stock quantity: " → "10"  ── parse ──► i64             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::product::add_product(&state, "Rice", 10, price)              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  AppResult<Product> ──► "✅ ..." or "❌ {message}"                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
pub mod customer;
pub mod product;
pub mod report;
pub mod sale;
