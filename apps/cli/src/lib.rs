//! # Shopkeep CLI
//!
//! Counter application for one shop: catalog, sales with printed receipts,
//! a customer directory and a profit/loss report behind a ten-item menu.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()     RUST_LOG or "warn,shopkeep=info", to stderr      │
//! │  2. AppConfig::load()  defaults → shopkeep.toml → SHOPKEEP_* env        │
//! │  3. AppState::open()   SQLite pool + migrations, bills directory        │
//! │  4. Menu::run()        stdin / stdout until Exit or end of input        │
//! │  5. AppState::close()  drain the pool                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod sink;
pub mod state;

use std::io;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::menu::Menu;
use crate::state::AppState;

/// Installs the global subscriber. Logs go to stderr so the menu on stdout
/// stays readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shopkeep=info,sqlx=warn"));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs one counter session against the configured store.
pub async fn run(config_path: Option<std::path::PathBuf>) -> AppResult<()> {
    let config = AppConfig::load(config_path)?;
    let state = AppState::open(&config).await?;

    info!(store = %config.store.name, "Starting Shopkeep");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = Menu::new(&state, stdin.lock(), stdout.lock()).run().await;

    state.close().await;
    result
}
