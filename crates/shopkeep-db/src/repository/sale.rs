//! # Sale Repository
//!
//! The sales ledger and its line snapshots.
//!
//! ## Staged Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stage(checkout, status, now)                                           │
//! │    BEGIN                                                                │
//! │    ├── UPDATE products SET stock = stock - q WHERE id = ? AND stock >= q│
//! │    │      (0 rows → InsufficientStock, transaction dropped)             │
//! │    ├── SELECT MAX(bill_no) → BillNumber::mint(last, now)                │
//! │    ├── INSERT sales                                                     │
//! │    └── INSERT sale_items (one per line)                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    StagedSale { record, lines }  ◄── caller writes the receipt          │
//! │         │                                                               │
//! │         ├── receipt stored  → commit()                                  │
//! │         └── receipt failed  → rollback()   (stock and ledger untouched) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing becomes visible to other readers until `commit()`.

use chrono::{DateTime, Local, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shopkeep_core::{
    BillNumber, Checkout, CoreError, Money, PaymentStatus, ProfitLossReport, SaleLine, SaleRecord,
};

const SALE_COLUMNS: &str = "bill_no, customer_name, customer_phone, sale_date, total_cents, \
                            status, created_at, updated_at";

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Writes a sale inside an open transaction and hands it back uncommitted.
    ///
    /// `now` supplies both the bill number clock and the local sale date.
    pub async fn stage(
        &self,
        checkout: &Checkout,
        status: PaymentStatus,
        now: DateTime<Local>,
    ) -> DbResult<StagedSale> {
        checkout.ensure_not_empty()?;

        let now_utc = now.with_timezone(&Utc);
        let mut tx = self.pool.begin().await?;

        for delta in checkout.stock_deltas() {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
                 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(&delta.product_id)
            .bind(delta.quantity)
            .bind(now_utc)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                        .bind(&delta.product_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                warn!(
                    product = %delta.name,
                    requested = delta.quantity,
                    available = ?available,
                    "Stock changed since the sale started"
                );

                let err = match available {
                    None => CoreError::ProductNotFound(delta.name.clone()),
                    Some(available) => CoreError::InsufficientStock {
                        product: delta.name.clone(),
                        available,
                        requested: delta.quantity,
                    },
                };
                return Err(err.into());
            }
        }

        let last: Option<i64> = sqlx::query_scalar("SELECT MAX(bill_no) FROM sales")
            .fetch_one(&mut *tx)
            .await?;
        let bill_no = BillNumber::mint(last.map(BillNumber::new), now_utc)?;

        let customer = checkout.customer();
        let record = SaleRecord {
            bill_no,
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            sale_date: now.date_naive(),
            total_cents: checkout.total().cents(),
            status,
            created_at: now_utc,
            updated_at: now_utc,
        };

        debug!(bill_no = %record.bill_no, total = %record.total(), "Inserting sale");

        sqlx::query(
            "INSERT INTO sales (bill_no, customer_name, customer_phone, sale_date, \
             total_cents, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(record.bill_no)
        .bind(&record.customer_name)
        .bind(&record.customer_phone)
        .bind(record.sale_date)
        .bind(record.total_cents)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await?;

        for (line_no, line) in checkout.lines().iter().enumerate() {
            sqlx::query(
                "INSERT INTO sale_items (id, bill_no, line_no, product_id, name, \
                 unit_price_cents, quantity, line_total_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(record.bill_no)
            .bind(line_no as i64)
            .bind(&line.product_id)
            .bind(&line.name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        Ok(StagedSale {
            tx,
            record,
            lines: checkout.lines().to_vec(),
        })
    }

    /// Changes the payment status of one bill.
    pub async fn update_status(
        &self,
        bill_no: BillNumber,
        status: PaymentStatus,
    ) -> DbResult<SaleRecord> {
        debug!(bill_no = %bill_no, status = %status, "Updating payment status");

        let result = sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE bill_no = ?1")
            .bind(bill_no)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BillNotFound(bill_no.to_string()).into());
        }

        self.get(bill_no)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", bill_no.to_string()))
    }

    // =========================================================================
    // Reading
    // =========================================================================

    pub async fn get(&self, bill_no: BillNumber) -> DbResult<Option<SaleRecord>> {
        let record = sqlx::query_as::<_, SaleRecord>(&format!(
            "SELECT {} FROM sales WHERE bill_no = ?1",
            SALE_COLUMNS
        ))
        .bind(bill_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Whole ledger in bill order.
    pub async fn list(&self) -> DbResult<Vec<SaleRecord>> {
        let records = sqlx::query_as::<_, SaleRecord>(&format!(
            "SELECT {} FROM sales ORDER BY bill_no",
            SALE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Line snapshots of one bill, in the order they were rung up.
    pub async fn items(&self, bill_no: BillNumber) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            "SELECT product_id, name, unit_price_cents, quantity, line_total_cents \
             FROM sale_items WHERE bill_no = ?1 ORDER BY line_no",
        )
        .bind(bill_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// First bill in ledger order that matches `query`.
    ///
    /// See [`SaleRecord::matches`] for the matching rules.
    pub async fn find(&self, query: &str) -> DbResult<Option<SaleRecord>> {
        let found = self
            .list()
            .await?
            .into_iter()
            .find(|record| record.matches(query));

        Ok(found)
    }

    /// Revenue, catalog valuation and profit/loss, read in one transaction.
    pub async fn profit_loss(&self) -> DbResult<ProfitLossReport> {
        let mut tx = self.pool.begin().await?;

        let (revenue, sale_count): (i64, i64) =
            sqlx::query_as("SELECT COALESCE(SUM(total_cents), 0), COUNT(*) FROM sales")
                .fetch_one(&mut *tx)
                .await?;

        let expense: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(price_cents * stock), 0) FROM products")
                .fetch_one(&mut *tx)
                .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(ProfitLossReport::new(
            Money::from_cents(revenue),
            Money::from_cents(expense),
            sale_count,
        ))
    }
}

// =============================================================================
// Staged Sale
// =============================================================================

/// A written but uncommitted sale.
///
/// Dropping it without calling [`StagedSale::commit`] rolls everything back.
pub struct StagedSale {
    tx: Transaction<'static, Sqlite>,
    record: SaleRecord,
    lines: Vec<SaleLine>,
}

impl std::fmt::Debug for StagedSale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedSale")
            .field("record", &self.record)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl StagedSale {
    pub fn record(&self) -> &SaleRecord {
        &self.record
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Makes the sale permanent.
    pub async fn commit(self) -> DbResult<SaleRecord> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            bill_no = %self.record.bill_no,
            total = %self.record.total(),
            lines = self.lines.len(),
            "Sale committed"
        );

        Ok(self.record)
    }

    /// Discards the sale: stock and ledger stay as they were.
    pub async fn rollback(self) -> DbResult<()> {
        warn!(bill_no = %self.record.bill_no, "Rolling back sale");

        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
