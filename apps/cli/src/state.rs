//! # Application State
//!
//! Everything a command needs: the database, the receipt sink and the store
//! details printed on receipts.

use std::sync::Arc;

use shopkeep_core::StoreInfo;
use shopkeep_db::{Database, DbConfig};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::sink::{DirectorySink, DocumentSink};

#[derive(Clone)]
pub struct AppState {
    db: Database,
    sink: Arc<dyn DocumentSink>,
    store: StoreInfo,
}

impl AppState {
    pub fn new(db: Database, sink: Arc<dyn DocumentSink>, store: StoreInfo) -> Self {
        AppState { db, sink, store }
    }

    /// Opens the configured database and bills directory.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let db = Database::new(DbConfig::new(&config.storage.database_path)).await?;
        let sink = DirectorySink::new(&config.storage.bills_dir, config.receipt.viewer.clone())?;

        info!(
            database = %config.storage.database_path.display(),
            bills = %config.storage.bills_dir.display(),
            store = %config.store.name,
            "Shop opened"
        );

        Ok(AppState::new(db, Arc::new(sink), config.store_info()))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn sink(&self) -> &dyn DocumentSink {
        self.sink.as_ref()
    }

    pub fn store(&self) -> &StoreInfo {
        &self.store
    }

    /// Formats an amount with the store's currency symbol.
    pub fn format_money(&self, amount: shopkeep_core::Money) -> String {
        amount.with_symbol(&self.store.currency_symbol)
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_database_and_bills_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.database_path = dir.path().join("data").join("shop.db");
        config.storage.bills_dir = dir.path().join("bills");

        let state = AppState::open(&config).await.unwrap();

        assert!(state.db().health_check().await);
        assert!(dir.path().join("bills").is_dir());
        assert_eq!(state.format_money(shopkeep_core::Money::from_cents(250)), "₹2.50");
        state.close().await;
    }
}
