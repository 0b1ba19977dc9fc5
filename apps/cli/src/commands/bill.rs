//! # Bill Commands
//!
//! Bill lookup and payment status changes.

use shopkeep_core::validation::validate_search_query;
use shopkeep_core::{BillNumber, CoreError, PaymentStatus, SaleRecord};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::state::AppState;

/// A ledger row together with its stored receipt.
#[derive(Debug, Clone)]
pub struct FoundBill {
    pub record: SaleRecord,
    pub receipt: String,
}

/// Finds the first bill (in bill order) matching `query` and loads its receipt.
///
/// `query` may be a bill number, a phone number, part of a customer name or
/// part of a `YYYY-MM-DD` date.
pub async fn find_bill(state: &AppState, query: &str) -> AppResult<FoundBill> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "find_bill command");

    let record = state
        .db()
        .sales()
        .find(&query)
        .await?
        .ok_or_else(|| CoreError::BillNotFound(query.clone()))?;

    let receipt = state.sink().fetch(record.bill_no)?.ok_or_else(|| {
        AppError::new(
            ErrorCode::DocumentMissing,
            format!("Bill file missing for bill {}", record.bill_no),
        )
    })?;

    if let Err(e) = state.sink().show(record.bill_no) {
        warn!(bill_no = %record.bill_no, error = %e, "Receipt viewer failed");
    }

    Ok(FoundBill { record, receipt })
}

/// Sets the payment status of the bill numbered `bill_no`.
pub async fn update_payment_status(
    state: &AppState,
    bill_no: &str,
    status: &str,
) -> AppResult<SaleRecord> {
    let trimmed = bill_no.trim();
    let bill_no: BillNumber = trimmed
        .parse()
        .map_err(|_| AppError::from(CoreError::BillNotFound(trimmed.to_string())))?;
    let status: PaymentStatus = status.parse()?;

    let record = state.db().sales().update_status(bill_no, status).await?;

    info!(bill_no = %record.bill_no, status = %record.status, "Payment status updated");
    Ok(record)
}
