//! # Checkout
//!
//! Plans a sale against a snapshot of the catalog before anything is written.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout::new(catalog snapshot, customer)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  request("rice", 2) ──► ProductNotFound      (line rejected, go on)    │
//! │       │             ──► InsufficientStock    (line rejected, go on)    │
//! │       │             ──► Validation           (line rejected, go on)    │
//! │       │             ──► Ok(&SaleLine)        (remaining -= 2)          │
//! │       ▼                                                                 │
//! │  lines() / total() / stock_deltas()                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  shopkeep-db stages the sale in one transaction                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejections leave the snapshot untouched, so a sale with some bad lines
//! can still complete with the good ones.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{name_key, Product, SaleCustomer};
use crate::validation::validate_quantity;
use crate::MAX_SALE_LINES;

// =============================================================================
// Sale Line
// =============================================================================

/// One accepted line of a sale, priced at the moment it was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub product_id: String,
    /// Product name as it read at sale time.
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl SaleLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// Net stock change for one product across a whole sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Clone)]
struct Shelf {
    product: Product,
    remaining: i64,
}

/// An in-progress sale.
#[derive(Debug, Clone)]
pub struct Checkout {
    customer: SaleCustomer,
    shelves: HashMap<String, Shelf>,
    lines: Vec<SaleLine>,
    total: Money,
}

impl Checkout {
    /// Starts a sale for `customer` against the given catalog snapshot.
    ///
    /// If two products share a name key, the one listed first is sold.
    pub fn new(catalog: Vec<Product>, customer: SaleCustomer) -> Self {
        let mut shelves = HashMap::with_capacity(catalog.len());
        for product in catalog {
            let remaining = product.stock;
            shelves
                .entry(name_key(&product.name))
                .or_insert(Shelf { product, remaining });
        }

        Checkout {
            customer,
            shelves,
            lines: Vec::new(),
            total: Money::zero(),
        }
    }

    pub fn customer(&self) -> &SaleCustomer {
        &self.customer
    }

    /// Tries to add `quantity` of the product called `name` (any case).
    ///
    /// Each accepted request becomes its own line; repeated requests for the
    /// same product draw down the same remaining stock.
    pub fn request(&mut self, name: &str, quantity: i64) -> CoreResult<&SaleLine> {
        let shelf = self
            .shelves
            .get_mut(&name_key(name))
            .ok_or_else(|| CoreError::ProductNotFound(name.trim().to_string()))?;

        validate_quantity(quantity)?;

        if quantity > shelf.remaining {
            return Err(CoreError::InsufficientStock {
                product: shelf.product.name.clone(),
                available: shelf.remaining,
                requested: quantity,
            });
        }

        if self.lines.len() >= MAX_SALE_LINES {
            return Err(CoreError::SaleTooLarge {
                max: MAX_SALE_LINES,
            });
        }

        let too_large = |field: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "amount is too large".to_string(),
        };

        let line_total = shelf
            .product
            .price()
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| too_large("line total"))?;
        let total = self
            .total
            .checked_add(line_total)
            .ok_or_else(|| too_large("sale total"))?;

        shelf.remaining -= quantity;
        self.total = total;

        self.lines.push(SaleLine {
            product_id: shelf.product.id.clone(),
            name: shelf.product.name.clone(),
            unit_price_cents: shelf.product.price_cents,
            quantity,
            line_total_cents: line_total.cents(),
        });

        // Just pushed, so last() is always Some.
        self.lines
            .last()
            .ok_or(CoreError::EmptySale)
    }

    /// Stock still available for `name` within this sale.
    pub fn remaining(&self, name: &str) -> Option<i64> {
        self.shelves.get(&name_key(name)).map(|s| s.remaining)
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line totals.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Per-product quantities to take off the shelf, in first-sold order.
    pub fn stock_deltas(&self) -> Vec<StockDelta> {
        let mut deltas: Vec<StockDelta> = Vec::new();

        for line in &self.lines {
            match deltas.iter_mut().find(|d| d.product_id == line.product_id) {
                Some(delta) => delta.quantity += line.quantity,
                None => deltas.push(StockDelta {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                }),
            }
        }

        deltas
    }

    /// Fails with [`CoreError::EmptySale`] if nothing was accepted.
    pub fn ensure_not_empty(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptySale);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, stock: i64, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            stock,
            price_cents,
            created_at: now,
            updated_at: now,
        }
    }

    fn checkout() -> Checkout {
        Checkout::new(
            vec![
                product("p-rice", "Rice", 5, 5500),
                product("p-tea", "Green Tea", 2, 12000),
            ],
            SaleCustomer::new("Asha", "9876543210"),
        )
    }

    #[test]
    fn test_accepts_line_case_insensitively() {
        let mut sale = checkout();
        let line = sale.request("rICE", 2).unwrap();

        assert_eq!(line.name, "Rice");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total_cents, 11000);
        assert_eq!(sale.remaining("rice"), Some(3));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let mut sale = checkout();
        assert!(matches!(
            sale.request("Coffee", 1),
            Err(CoreError::ProductNotFound(name)) if name == "Coffee"
        ));
        assert!(sale.is_empty());
    }

    #[test]
    fn test_insufficient_stock_leaves_snapshot_unchanged() {
        let mut sale = checkout();
        let err = sale.request("Green Tea", 3).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
        assert_eq!(sale.remaining("green tea"), Some(2));
        assert!(sale.is_empty());
    }

    #[test]
    fn test_non_positive_quantity_is_rejected() {
        let mut sale = checkout();
        assert!(matches!(
            sale.request("Rice", 0),
            Err(CoreError::Validation(_))
        ));
        assert!(sale.request("Rice", -2).is_err());
        assert_eq!(sale.remaining("Rice"), Some(5));
    }

    #[test]
    fn test_repeated_requests_consume_cumulatively() {
        let mut sale = checkout();
        sale.request("Rice", 3).unwrap();
        sale.request("rice", 2).unwrap();

        assert!(matches!(
            sale.request("Rice", 1),
            Err(CoreError::InsufficientStock { available: 0, .. })
        ));

        assert_eq!(sale.lines().len(), 2);
        let deltas = sale.stock_deltas();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].product_id, "p-rice");
        assert_eq!(deltas[0].quantity, 5);
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let mut sale = checkout();
        sale.request("Rice", 2).unwrap();
        sale.request("Green Tea", 1).unwrap();
        sale.request("Rice", 1).unwrap();

        let by_hand: i64 = sale.lines().iter().map(|l| l.unit_price_cents * l.quantity).sum();
        assert_eq!(sale.total().cents(), by_hand);
        assert_eq!(sale.total().cents(), 3 * 5500 + 12000);
    }

    #[test]
    fn test_line_that_overflows_the_total_is_rejected() {
        let price = Money::from_cents(5_000_000_000_000_000_000);
        let mut sale = Checkout::new(
            vec![product("p-gold", "Gold", 2, price.cents())],
            SaleCustomer::new("Asha", "9876543210"),
        );

        sale.request("Gold", 1).unwrap();
        let err = sale.request("Gold", 1).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { ref field, .. }) if field == "sale total"
        ));
        assert_eq!(sale.lines().len(), 1);
        assert_eq!(sale.total(), price);
        assert_eq!(sale.remaining("gold"), Some(1));
    }

    #[test]
    fn test_line_total_overflow_is_rejected() {
        let mut sale = Checkout::new(
            vec![product("p-gold", "Gold", 5, i64::MAX / 2)],
            SaleCustomer::new("Asha", "9876543210"),
        );

        assert!(sale.request("Gold", 3).is_err());
        assert!(sale.is_empty());
        assert_eq!(sale.remaining("Gold"), Some(5));
    }

    #[test]
    fn test_first_listed_product_wins_a_shared_key() {
        let mut sale = Checkout::new(
            vec![product("p-1", "Äpfel", 4, 300), product("p-2", "äpfel", 6, 300)],
            SaleCustomer::new("Asha", "9876543210"),
        );
        assert_eq!(sale.request("ÄPFEL", 1).unwrap().product_id, "p-1");
        assert_eq!(sale.remaining("äpfel"), Some(3));
    }

    #[test]
    fn test_empty_sale() {
        let sale = checkout();
        assert!(matches!(sale.ensure_not_empty(), Err(CoreError::EmptySale)));
        assert_eq!(sale.total(), Money::zero());
        assert!(sale.stock_deltas().is_empty());
    }
}
