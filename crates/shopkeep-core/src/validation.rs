//! # Validation Module
//!
//! Input checks applied before anything reaches storage.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Menu prompt (apps/cli)                                        │
//! │  └── Parses text into numbers / Money / PaymentStatus                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  └── Business rules: non-empty names, positive quantities, ...          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  └── CHECK (stock >= 0), UNIQUE (name / phone / bill_no)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopkeep_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Basmati Rice 1kg").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 20;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn required_trimmed<'a>(field: &str, value: &'a str, max: usize) -> ValidationResult<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value)
}

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use shopkeep_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Sugar ").unwrap(), "Sugar");
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_trimmed("product name", name, MAX_NAME_LEN).map(str::to_string)
}

/// Validates a customer name and returns it trimmed.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required_trimmed("customer name", name, MAX_NAME_LEN).map(str::to_string)
}

/// Validates a phone number and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - Digits, spaces, `+` and `-` only
/// - At least one digit
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = required_trimmed("phone", phone, MAX_PHONE_LEN)?;

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ');

    if !allowed || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "use digits, spaces, '+' or '-'".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Validates a lookup query.
///
/// Unlike a catalog listing, a lookup with nothing to match on is rejected.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    required_trimmed("search", query, MAX_QUERY_LEN).map(str::to_string)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## User Workflow
/// ```text
/// Enter quantity: 0
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0?     → "quantity must be positive"
///      ├── qty > 9999?   → "quantity must be between 1 and 9999"
///      └── OK            → check stock
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
