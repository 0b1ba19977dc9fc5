//! # Sale Commands
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin_sale(name, phone)        catalog snapshot → Checkout             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout.request(..) × n       (menu loop, rejections are per line)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  complete_sale(checkout, status)                                        │
//! │    1. stage         stock decremented, ledger row written, uncommitted  │
//! │    2. render        receipt text from the staged row and lines          │
//! │    3. sink.store    ── fails ──► rollback, report error                 │
//! │    4. commit        ── fails ──► sink.remove, report error              │
//! │    5. sink.show     ── fails ──► warning only, sale stands              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger row and the receipt are produced from the same `SaleRecord`,
//! so both carry the same bill number and total.

use chrono::Local;
use shopkeep_core::validation::{validate_customer_name, validate_phone};
use shopkeep_core::{render_receipt, Checkout, PaymentStatus, SaleCustomer, SaleRecord};
use tracing::{debug, error, info, warn};

use crate::error::AppResult;
use crate::state::AppState;

/// A sale that reached the ledger.
#[derive(Debug, Clone)]
pub struct CompletedSale {
    pub record: SaleRecord,
    pub receipt: String,
    /// Where the receipt was stored.
    pub location: String,
}

/// Starts a sale against the current catalog.
pub async fn begin_sale(state: &AppState, name: &str, phone: &str) -> AppResult<Checkout> {
    let customer = SaleCustomer::new(validate_customer_name(name)?, validate_phone(phone)?);
    let catalog = state.db().products().list().await?;

    debug!(customer = %customer.name, products = catalog.len(), "begin_sale command");
    Ok(Checkout::new(catalog, customer))
}

/// Persists the sale and its receipt, or neither.
pub async fn complete_sale(
    state: &AppState,
    checkout: &Checkout,
    status: PaymentStatus,
) -> AppResult<CompletedSale> {
    let staged = state
        .db()
        .sales()
        .stage(checkout, status, Local::now())
        .await?;

    let bill_no = staged.record().bill_no;
    let receipt = render_receipt(state.store(), staged.record(), staged.lines());

    let location = match state.sink().store(bill_no, &receipt) {
        Ok(location) => location,
        Err(sink_err) => {
            if let Err(e) = staged.rollback().await {
                error!(bill_no = %bill_no, error = %e, "Rollback after receipt failure failed");
            }
            return Err(sink_err.into());
        }
    };

    let record = match staged.commit().await {
        Ok(record) => record,
        Err(commit_err) => {
            if let Err(e) = state.sink().remove(bill_no) {
                error!(bill_no = %bill_no, error = %e, "Orphaned receipt could not be removed");
            }
            return Err(commit_err.into());
        }
    };

    if let Err(e) = state.sink().show(bill_no) {
        warn!(bill_no = %bill_no, error = %e, "Receipt viewer failed");
    }

    info!(
        bill_no = %record.bill_no,
        total = %record.total(),
        status = %record.status,
        "Sale completed"
    );

    Ok(CompletedSale {
        record,
        receipt,
        location,
    })
}
