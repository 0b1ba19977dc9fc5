//! # Product Repository
//!
//! The catalog: products keyed by name, ignoring case.
//!
//! Every row carries a `name_key` (the trimmed, lower-cased name) under a
//! unique index. Lookups compare keys, so "Äpfel" and "äpfel" are the same
//! product.
//!
//! ## Add vs Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add("rice", 10, 55.00)      existing "Rice" stock 4 @ 50.00            │
//! │      └──► "Rice" stock 14 @ 55.00   (stock merged, price overwritten)   │
//! │                                                                         │
//! │  add("Sugar", 5, 42.00)      no match                                   │
//! │      └──► new row "Sugar" stock 5 @ 42.00                               │
//! │                                                                         │
//! │  update("rice", 7, 60.00)    existing "Rice"                            │
//! │      └──► "Rice" stock 7 @ 60.00    (absolute)                          │
//! │                                                                         │
//! │  update("Flour", ..)         no match → NotFound                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shopkeep_core::validation::{validate_price, validate_product_name, validate_stock};
use shopkeep_core::{name_key, Money, Product, ValidationError};

const PRODUCT_COLUMNS: &str = "id, name, stock, price_cents, created_at, updated_at";

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// repo.add("Rice", 10, "55.00".parse()?).await?;
/// let rice = repo.get_by_name("RICE").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Case-insensitive lookup by name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE name_key = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(name_key(name))
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Adds stock for a product, creating it if the name is new.
    ///
    /// Existing product: `stock += stock`, `price = price`.
    pub async fn add(&self, name: &str, stock: i64, price: Money) -> DbResult<Product> {
        let name = validate_product_name(name)?;
        let key = name_key(&name);
        validate_stock(stock)?;
        validate_price(price)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE name_key = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(&key)
        .fetch_optional(&mut *tx)
        .await?;

        let product = match existing {
            Some(mut product) => {
                let merged = product
                    .stock
                    .checked_add(stock)
                    .ok_or_else(|| ValidationError::OutOfRange {
                        field: "stock".to_string(),
                        min: 0,
                        max: i64::MAX,
                    })?;

                debug!(id = %product.id, added = stock, stock = merged, "Merging product stock");

                sqlx::query(
                    "UPDATE products SET stock = ?2, price_cents = ?3, updated_at = ?4 WHERE id = ?1",
                )
                .bind(&product.id)
                .bind(merged)
                .bind(price.cents())
                .bind(now)
                .execute(&mut *tx)
                .await?;

                product.stock = merged;
                product.price_cents = price.cents();
                product.updated_at = now;
                product
            }
            None => {
                let product = Product {
                    id: generate_product_id(),
                    name,
                    stock,
                    price_cents: price.cents(),
                    created_at: now,
                    updated_at: now,
                };

                debug!(id = %product.id, name = %product.name, "Inserting product");

                sqlx::query(
                    "INSERT INTO products (id, name, name_key, stock, price_cents, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .bind(&product.id)
                .bind(&product.name)
                .bind(&key)
                .bind(product.stock)
                .bind(product.price_cents)
                .bind(product.created_at)
                .bind(product.updated_at)
                .execute(&mut *tx)
                .await?;

                product
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(product)
    }

    /// Sets stock and price of an existing product.
    pub async fn update(&self, name: &str, stock: i64, price: Money) -> DbResult<Product> {
        let name = validate_product_name(name)?;
        validate_stock(stock)?;
        validate_price(price)?;

        debug!(name = %name, stock, price = %price, "Updating product");

        let result = sqlx::query(
            "UPDATE products SET stock = ?2, price_cents = ?3, updated_at = ?4 \
             WHERE name_key = ?1",
        )
        .bind(name_key(&name))
        .bind(stock)
        .bind(price.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", name));
        }

        self.get_by_name(&name)
            .await?
            .ok_or_else(|| DbError::not_found("Product", name))
    }

    /// Every product, in the order it was first added.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY rowid",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Σ price × stock over the whole catalog.
    pub async fn valuation(&self) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(price_cents * stock), 0) FROM products")
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbError};
    use shopkeep_core::{CoreError, Money};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_add_creates_product() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        let rice = repo.add("  Rice ", 10, money("55.00")).await.unwrap();
        assert_eq!(rice.name, "Rice");
        assert_eq!(rice.stock, 10);
        assert_eq!(rice.price_cents, 5500);

        let fetched = repo.get_by_name("RICE").await.unwrap().unwrap();
        assert_eq!(fetched, rice);
    }

    #[tokio::test]
    async fn test_add_twice_merges_stock_and_overwrites_price() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        let first = repo.add("Rice", 4, money("50")).await.unwrap();
        let second = repo.add("rice", 10, money("55.5")).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Rice");
        assert_eq!(second.stock, 14);
        assert_eq!(second.price_cents, 5550);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_ascii_names_share_one_row() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        let first = repo.add("Äpfel", 4, money("3")).await.unwrap();
        let second = repo.add("äpfel", 6, money("3.5")).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Äpfel");
        assert_eq!(second.stock, 10);
        assert_eq!(repo.count().await.unwrap(), 1);

        assert_eq!(repo.get_by_name("ÄPFEL").await.unwrap().unwrap().id, first.id);
        let updated = repo.update("äPFEL", 2, money("4")).await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.stock, 2);
    }

    #[tokio::test]
    async fn test_name_key_index_rejects_case_variants() {
        let db = Database::in_memory().await.unwrap();
        db.products().add("Äpfel", 1, money("1")).await.unwrap();

        let insert = sqlx::query(
            "INSERT INTO products (id, name, name_key, stock, price_cents, created_at, updated_at) \
             VALUES ('x', 'ÄPFEL', 'äpfel', 1, 100, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await;

        assert!(insert.is_err());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        assert!(matches!(
            repo.add("", 1, money("1")).await,
            Err(DbError::Rule(CoreError::Validation(_)))
        ));
        assert!(repo.add("Rice", -1, money("1")).await.is_err());
        assert!(repo.add("Rice", 1, money("-1")).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_sets_absolute_values() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        repo.add("Sugar", 20, money("42")).await.unwrap();
        let updated = repo.update("SUGAR", 7, money("44.25")).await.unwrap();

        assert_eq!(updated.stock, 7);
        assert_eq!(updated.price_cents, 4425);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .products()
            .update("Flour", 1, money("1"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_valuation() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        assert_eq!(repo.valuation().await.unwrap(), Money::zero());

        repo.add("Rice", 2, money("55")).await.unwrap();
        repo.add("Tea", 3, money("120.50")).await.unwrap();
        repo.add("Salt", 0, money("20")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Rice", "Tea", "Salt"]);
        assert_eq!(repo.valuation().await.unwrap().cents(), 2 * 5500 + 3 * 12050);
    }
}
