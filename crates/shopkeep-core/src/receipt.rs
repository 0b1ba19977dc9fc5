//! # Receipt Layout
//!
//! Renders the plain-text bill handed to the customer.
//!
//! ```text
//! ==================== CORNER STORE ====================
//! Address: 12 Market Road
//! GSTIN: 27ABCDE1234F1Z5
//! Bill No: 1709287200
//! Customer Name: Asha
//! Customer Phone: 9876543210
//! Date: 2024-03-01
//! ------------------------------------------------------------
//! Item                           Quantity   Price      Total
//! ----------------------------------------------------------------------
//! Rice                           2          55.00      110.00
//! ----------------------------------------------------------------------
//! Grand Total:                                       ₹110.00
//! Payment Status:                                    Paid
//! ==================== THANK YOU! VISIT AGAIN ====================
//! ```
//!
//! Rendering is pure; writing the text somewhere is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::checkout::SaleLine;
use crate::types::SaleRecord;

const BANNER: &str = "====================";
const HEADER_RULE_WIDTH: usize = 60;
const TABLE_RULE_WIDTH: usize = 70;

/// Store details printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    /// GSTIN or equivalent tax registration number.
    pub tax_id: String,
    pub currency_symbol: String,
}

/// Renders the receipt for `record` with its `lines`.
///
/// The grand total printed is `record.total_cents`; the ledger row and
/// the document therefore always agree.
pub fn render_receipt(store: &StoreInfo, record: &SaleRecord, lines: &[SaleLine]) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_receipt(&mut out, store, record, lines);
    out
}

fn write_receipt(
    out: &mut String,
    store: &StoreInfo,
    record: &SaleRecord,
    lines: &[SaleLine],
) -> std::fmt::Result {
    writeln!(out, "{} {} {}", BANNER, store.name.to_uppercase(), BANNER)?;
    if !store.address.trim().is_empty() {
        writeln!(out, "Address: {}", store.address)?;
    }
    if !store.tax_id.trim().is_empty() {
        writeln!(out, "GSTIN: {}", store.tax_id)?;
    }
    writeln!(out, "Bill No: {}", record.bill_no)?;
    writeln!(out, "Customer Name: {}", record.customer_name)?;
    writeln!(out, "Customer Phone: {}", record.customer_phone)?;
    writeln!(out, "Date: {}", record.sale_date.format("%Y-%m-%d"))?;
    writeln!(out, "{}", "-".repeat(HEADER_RULE_WIDTH))?;

    row(out, "Item", "Quantity", "Price", "Total")?;
    writeln!(out, "{}", "-".repeat(TABLE_RULE_WIDTH))?;

    for line in lines {
        row(
            out,
            &line.name,
            &line.quantity.to_string(),
            &line.unit_price().to_string(),
            &line.line_total().to_string(),
        )?;
    }

    writeln!(out, "{}", "-".repeat(TABLE_RULE_WIDTH))?;
    writeln!(
        out,
        "{:<50} {}",
        "Grand Total:",
        record.total().with_symbol(&store.currency_symbol)
    )?;
    writeln!(out, "{:<50} {}", "Payment Status:", record.status)?;
    writeln!(out, "{} THANK YOU! VISIT AGAIN {}", BANNER, BANNER)?;

    Ok(())
}

fn row(out: &mut String, item: &str, qty: &str, price: &str, total: &str) -> std::fmt::Result {
    let rendered = format!("{:<30} {:<10} {:<10} {:<10}", item, qty, price, total);
    writeln!(out, "{}", rendered.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::BillNumber;
    use crate::types::PaymentStatus;
    use chrono::{NaiveDate, Utc};

    fn store() -> StoreInfo {
        StoreInfo {
            name: "Corner Store".to_string(),
            address: "12 Market Road".to_string(),
            tax_id: "27ABCDE1234F1Z5".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }

    fn record(total_cents: i64) -> SaleRecord {
        let now = Utc::now();
        SaleRecord {
            bill_no: BillNumber::new(1_709_287_200),
            customer_name: "Asha".to_string(),
            customer_phone: "9876543210".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_cents,
            status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(name: &str, qty: i64, price: i64) -> SaleLine {
        SaleLine {
            product_id: format!("id-{}", name),
            name: name.to_string(),
            unit_price_cents: price,
            quantity: qty,
            line_total_cents: price * qty,
        }
    }

    #[test]
    fn test_receipt_layout() {
        let lines = vec![line("Rice", 2, 5500), line("Tea", 1, 12000)];
        let text = render_receipt(&store(), &record(23000), &lines);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], "==================== CORNER STORE ====================");
        assert_eq!(rows[1], "Address: 12 Market Road");
        assert_eq!(rows[2], "GSTIN: 27ABCDE1234F1Z5");
        assert_eq!(rows[3], "Bill No: 1709287200");
        assert_eq!(rows[4], "Customer Name: Asha");
        assert_eq!(rows[5], "Customer Phone: 9876543210");
        assert_eq!(rows[6], "Date: 2024-03-01");
        assert_eq!(rows[7], "-".repeat(60));
        assert_eq!(
            rows[8],
            format!("{:<30} {:<10} {:<10} Total", "Item", "Quantity", "Price")
        );
        assert_eq!(rows[9], "-".repeat(70));
        assert_eq!(
            rows[10],
            format!("{:<30} {:<10} {:<10} 110.00", "Rice", "2", "55.00")
        );
        assert_eq!(rows[12], "-".repeat(70));
        assert_eq!(rows[13], format!("{:<50} ₹230.00", "Grand Total:"));
        assert_eq!(rows[14], format!("{:<50} Unpaid", "Payment Status:"));
        assert_eq!(
            rows[15],
            "==================== THANK YOU! VISIT AGAIN ===================="
        );
        assert_eq!(rows.len(), 16);
    }

    #[test]
    fn test_blank_store_details_are_skipped() {
        let mut store = store();
        store.address.clear();
        store.tax_id = "  ".to_string();

        let text = render_receipt(&store, &record(0), &[]);
        assert!(!text.contains("Address:"));
        assert!(!text.contains("GSTIN:"));
        assert!(text.contains("Bill No: 1709287200"));
    }
}
