//! # Product Commands
//!
//! Catalog maintenance: add (upsert), update, view.

use shopkeep_core::{Money, Product};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Adds stock to a product, creating it when the name is new.
pub async fn add_product(
    state: &AppState,
    name: &str,
    stock: i64,
    price: Money,
) -> AppResult<Product> {
    debug!(name = %name, stock, price = %price, "add_product command");

    let product = state.db().products().add(name, stock, price).await?;

    info!(
        id = %product.id,
        name = %product.name,
        stock = product.stock,
        "Product added/updated"
    );
    Ok(product)
}

/// Current record for `name`, used before asking for new values.
pub async fn get_product(state: &AppState, name: &str) -> AppResult<Product> {
    state
        .db()
        .products()
        .get_by_name(name)
        .await?
        .ok_or_else(|| AppError::not_found("Product", name.trim()))
}

/// Sets stock and price of an existing product.
pub async fn update_product(
    state: &AppState,
    name: &str,
    stock: i64,
    price: Money,
) -> AppResult<Product> {
    debug!(name = %name, stock, price = %price, "update_product command");

    let product = state.db().products().update(name, stock, price).await?;

    info!(id = %product.id, stock = product.stock, "Product updated");
    Ok(product)
}

pub async fn list_inventory(state: &AppState) -> AppResult<Vec<Product>> {
    Ok(state.db().products().list().await?)
}

/// Renders the inventory as an aligned Product / Stock / Price table.
pub fn inventory_table(products: &[Product]) -> String {
    let mut out = format!("{:<30} {:<10} {:<10}\n", "Product", "Stock", "Price")
        .trim_end()
        .to_string();
    out.push('\n');
    out.push_str(&"-".repeat(50));
    out.push('\n');

    for product in products {
        let row = format!(
            "{:<30} {:<10} {:<10}",
            product.name,
            product.stock,
            product.price()
        );
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::memory_state;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_add_then_add_again_merges() {
        let (state, _) = memory_state().await;

        add_product(&state, "Rice", 4, money("50")).await.unwrap();
        let merged = add_product(&state, "RICE", 6, money("52.5")).await.unwrap();

        assert_eq!(merged.stock, 10);
        assert_eq!(merged.price_cents, 5250);
        assert_eq!(list_inventory(&state).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_and_update() {
        let (state, _) = memory_state().await;
        add_product(&state, "Tea", 3, money("120")).await.unwrap();

        let current = get_product(&state, "tea").await.unwrap();
        assert_eq!(current.stock, 3);

        let updated = update_product(&state, "TEA", 9, money("99.99")).await.unwrap();
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.price_cents, 9999);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let (state, _) = memory_state().await;

        let err = get_product(&state, "Coffee").await.unwrap_err();
        assert!(err.is(ErrorCode::NotFound));

        let err = update_product(&state, "Coffee", 1, money("1")).await.unwrap_err();
        assert!(err.is(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn test_add_rejects_negative_stock() {
        let (state, _) = memory_state().await;
        let err = add_product(&state, "Rice", -1, money("1")).await.unwrap_err();
        assert!(err.is(ErrorCode::ValidationError));
    }

    #[test]
    fn test_inventory_table() {
        let now = chrono::Utc::now();
        let products = vec![Product {
            id: "p1".to_string(),
            name: "Rice".to_string(),
            stock: 12,
            price_cents: 5500,
            created_at: now,
            updated_at: now,
        }];

        let table = inventory_table(&products);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], format!("{:<30} {:<10} Price", "Product", "Stock"));
        assert_eq!(lines[1], "-".repeat(50));
        assert_eq!(lines[2], format!("{:<30} {:<10} 55.00", "Rice", "12"));
        assert_eq!(lines.len(), 3);
    }
}
