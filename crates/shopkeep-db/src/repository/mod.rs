//! # Repository Module
//!
//! One repository per table group, each holding a clone of the pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command ──► Repository method ──► one transaction / one statement      │
//! │                                                                         │
//! │  ProductRepository   products                                           │
//! │  SaleRepository      sales + sale_items (+ products stock on sale)      │
//! │  CustomerRepository  customers                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod product;
pub mod sale;
