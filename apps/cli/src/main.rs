//! `shopkeep` binary.
//!
//! ```text
//! shopkeep [--config <path>]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

fn parse_args() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args().skip(1);
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config needs a path".to_string())?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("Usage: shopkeep [--config <path>]");
                println!();
                println!("Environment: SHOPKEEP_CONFIG, SHOPKEEP_DB_PATH, SHOPKEEP_BILLS_DIR,");
                println!("             SHOPKEEP_STORE_NAME, SHOPKEEP_VIEWER, SHOPKEEP_CURRENCY, RUST_LOG");
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    shopkeep_cli::init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match shopkeep_cli::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = ?e.code, "Shopkeep stopped");
            eprintln!("❌ {}", e.message);
            ExitCode::FAILURE
        }
    }
}
