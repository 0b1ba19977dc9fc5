//! # Profit / Loss Report
//!
//! ```text
//! revenue     = Σ ledger totals
//! expense     = Σ price × stock over the current catalog
//! profit_loss = revenue − expense
//! ```
//!
//! There is no cost basis: unsold shelf value counts as expense. The figure
//! is kept exactly as the shop has always read it.

use serde::{Deserialize, Serialize};

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    pub revenue: Money,
    pub expense: Money,
    pub profit_loss: Money,
    /// Number of ledger rows behind `revenue`.
    pub sale_count: i64,
}

impl ProfitLossReport {
    pub fn new(revenue: Money, expense: Money, sale_count: i64) -> Self {
        ProfitLossReport {
            revenue,
            expense,
            profit_loss: revenue - expense,
            sale_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_loss_is_revenue_minus_expense() {
        let report = ProfitLossReport::new(Money::from_cents(50_000), Money::from_cents(12_550), 4);
        assert_eq!(report.profit_loss.cents(), 37_450);

        let report = ProfitLossReport::new(Money::zero(), Money::from_cents(990), 0);
        assert_eq!(report.profit_loss.cents(), -990);
        assert!(report.profit_loss.is_negative());
    }
}
