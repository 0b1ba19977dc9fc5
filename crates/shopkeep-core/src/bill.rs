//! # Bill Numbers
//!
//! Every completed sale gets a bill number printed on its receipt and used
//! as the ledger key.
//!
//! ## Minting Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next = max(unix_seconds(now), last + 1)                                │
//! │                                                                         │
//! │  10:00:00  sale A  → 1709287200                                         │
//! │  10:00:00  sale B  → 1709287201   (same second, bumped past A)          │
//! │  10:00:05  sale C  → 1709287205   (clock moved ahead of B)              │
//! │  clock set back    → last + 1     (never reuses or goes backwards)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The number still reads as a creation timestamp in the common case, and is
//! strictly increasing along the ledger. `last` must be read inside the same
//! storage transaction that inserts the new row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};

/// Unique, strictly increasing sale identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct BillNumber(i64);

impl BillNumber {
    #[inline]
    pub const fn new(value: i64) -> Self {
        BillNumber(value)
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Mints the bill number that follows `last` at time `now`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use shopkeep_core::BillNumber;
    ///
    /// let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    /// let first = BillNumber::mint(None, now).unwrap();
    /// let second = BillNumber::mint(Some(first), now).unwrap();
    /// assert_eq!(first.value(), 1_700_000_000);
    /// assert_eq!(second.value(), 1_700_000_001);
    /// ```
    pub fn mint(last: Option<BillNumber>, now: DateTime<Utc>) -> CoreResult<BillNumber> {
        let from_clock = now.timestamp().max(1);

        let next = match last {
            None => from_clock,
            Some(last) => {
                let bumped = last
                    .0
                    .checked_add(1)
                    .ok_or(CoreError::BillSequenceExhausted)?;
                from_clock.max(bumped)
            }
        };

        Ok(BillNumber(next))
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl FromStr for BillNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "bill number".to_string(),
            });
        }

        let value: i64 = s
            .parse()
            .ok()
            .filter(|v| *v > 0 && s.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "bill number".to_string(),
                reason: "must be a positive whole number".to_string(),
            })?;

        Ok(BillNumber(value))
    }
}
