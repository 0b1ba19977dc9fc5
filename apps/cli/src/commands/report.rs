//! # Report Command
//!
//! Revenue is the sum of every ledger total. Expense is the current catalog
//! valuation (price × stock). Profit/loss is their difference; cost basis of
//! sold goods is not tracked.

use shopkeep_core::ProfitLossReport;
use tracing::debug;

use crate::error::AppResult;
use crate::state::AppState;

pub async fn generate_report(state: &AppState) -> AppResult<ProfitLossReport> {
    let report = state.db().sales().profit_loss().await?;

    debug!(
        revenue = %report.revenue,
        expense = %report.expense,
        sales = report.sale_count,
        "Report generated"
    );
    Ok(report)
}

/// Annual report text as printed by the menu.
pub fn render_report(state: &AppState, report: &ProfitLossReport) -> String {
    format!(
        "========== Annual Report ==========\n\
         Total Revenue: {}\n\
         Total Expense: {}\n\
         Net Profit/Loss: {}\n\
         Sales Recorded: {}\n",
        state.format_money(report.revenue),
        state.format_money(report.expense),
        state.format_money(report.profit_loss),
        report.sale_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::add_product;
    use crate::commands::sale::{begin_sale, complete_sale};
    use crate::state::testing::memory_state;
    use shopkeep_core::{Money, PaymentStatus};

    #[tokio::test]
    async fn test_empty_shop_reports_zero() {
        let (state, _) = memory_state().await;
        let report = generate_report(&state).await.unwrap();

        assert_eq!(report.revenue, Money::zero());
        assert_eq!(report.expense, Money::zero());
        assert_eq!(report.profit_loss, Money::zero());
        assert_eq!(report.sale_count, 0);
    }

    #[tokio::test]
    async fn test_revenue_minus_remaining_valuation() {
        let (state, _) = memory_state().await;
        add_product(&state, "Rice", 10, Money::from_cents(5000)).await.unwrap();

        let mut checkout = begin_sale(&state, "Asha", "111").await.unwrap();
        checkout.request("Rice", 2).unwrap();
        complete_sale(&state, &checkout, PaymentStatus::Unpaid).await.unwrap();

        let report = generate_report(&state).await.unwrap();
        assert_eq!(report.revenue, Money::from_cents(10_000));
        assert_eq!(report.expense, Money::from_cents(40_000));
        assert_eq!(report.profit_loss, Money::from_cents(-30_000));
        assert_eq!(report.sale_count, 1);

        let text = render_report(&state, &report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "========== Annual Report ==========",
                "Total Revenue: ₹100.00",
                "Total Expense: ₹400.00",
                "Net Profit/Loss: -₹300.00",
                "Sales Recorded: 1",
            ]
        );
    }
}
