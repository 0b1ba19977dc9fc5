//! # Domain Types
//!
//! Core records used throughout Shopkeep.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   SaleRecord    │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  bill_no        │   │  phone (key)    │       │
//! │  │  name (key, ci) │   │  customer_*     │   │  name           │       │
//! │  │  stock          │   │  sale_date      │   └─────────────────┘       │
//! │  │  price_cents    │   │  total_cents    │                             │
//! │  └─────────────────┘   │  status         │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │ PaymentStatus   │       │
//! │                                              │  Paid / Unpaid  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Products carry a UUID `id` for row identity and a case-insensitive `name`
//! that the operator types. Customers are keyed by phone; sales by bill number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bill::BillNumber;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name; unique ignoring case.
    pub name: String,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Unit price in cents.
    pub price_cents: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Normalises a product name into its lookup key.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether the customer has settled the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Case-insensitive: `paid`, `PAID` and `Paid` all parse.
impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            _ => Err(ValidationError::NotAllowed {
                field: "payment status".to_string(),
                allowed: vec!["Paid".to_string(), "Unpaid".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One row of the sales ledger.
///
/// Immutable once written, except `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub bill_no: BillNumber,
    pub customer_name: String,
    pub customer_phone: String,
    /// Local calendar date of the sale.
    pub sale_date: NaiveDate,
    pub total_cents: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SaleRecord {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Bill lookup predicate.
    ///
    /// ## Matching Rules
    /// ```text
    /// query == bill number               → match
    /// query == customer phone            → match
    /// query ⊂ customer name (any case)   → match
    /// query ⊂ sale date (YYYY-MM-DD)     → match
    /// ```
    /// A blank query matches nothing.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        query == self.bill_no.to_string()
            || query == self.customer_phone
            || self
                .customer_name
                .to_lowercase()
                .contains(&query.to_lowercase())
            || self.sale_date.format("%Y-%m-%d").to_string().contains(query)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. Phone is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Query is a case-insensitive substring of the name, or equals the phone.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        query == self.phone || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Who a sale is billed to. The customer does not need to be registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCustomer {
    pub name: String,
    pub phone: String,
}

impl SaleCustomer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        SaleCustomer {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(name: &str, stock: i64, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: name.to_string(),
            stock,
            price_cents,
            created_at: now,
            updated_at: now,
        }
    }

    fn sale(bill: i64, name: &str, phone: &str, date: (i32, u32, u32)) -> SaleRecord {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        SaleRecord {
            bill_no: BillNumber::new(bill),
            customer_name: name.to_string(),
            customer_phone: phone.to_string(),
            sale_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total_cents: 1000,
            status: PaymentStatus::Paid,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_price() {
        assert_eq!(product("Rice 1kg", 4, 5500).price().to_string(), "55.00");
    }

    #[test]
    fn test_name_key_folds_case_and_whitespace() {
        assert_eq!(name_key("  BASMATI Rice "), "basmati rice");
        assert_eq!(name_key("ÄPFEL"), name_key("äpfel"));
        assert_ne!(name_key("basmati"), name_key("basmati rice"));
    }

    #[test]
    fn test_payment_status_parsing() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("UNPAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Unpaid);
        assert_eq!(" Paid ".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert!("later".parse::<PaymentStatus>().is_err());
        assert_eq!(PaymentStatus::Unpaid.to_string(), "Unpaid");
    }

    #[test]
    fn test_sale_record_matches() {
        let record = sale(1709287200, "Asha Verma", "9876543210", (2024, 3, 1));

        assert!(record.matches("1709287200"));
        assert!(record.matches("9876543210"));
        assert!(record.matches("asha"));
        assert!(record.matches("VERMA"));
        assert!(record.matches("2024-03"));
        assert!(record.matches("2024-03-01"));

        assert!(!record.matches("170928720"));
        assert!(!record.matches("987654321"));
        assert!(!record.matches("2024-04"));
        assert!(!record.matches("   "));
    }

    #[test]
    fn test_customer_matches() {
        let customer = Customer {
            phone: "555-0101".to_string(),
            name: "Ravi Kumar".to_string(),
            created_at: Utc::now(),
        };

        assert!(customer.matches("ravi"));
        assert!(customer.matches("555-0101"));
        assert!(!customer.matches("555"));
        assert!(!customer.matches(""));
    }
}
