//! # Customer Repository
//!
//! Customer directory keyed by phone number. Add and look up only.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopkeep_core::validation::{validate_customer_name, validate_phone, validate_search_query};
use shopkeep_core::{CoreError, Customer};

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer. Fails with `CustomerExists` if the phone is taken.
    pub async fn add(&self, name: &str, phone: &str) -> DbResult<Customer> {
        let name = validate_customer_name(name)?;
        let phone = validate_phone(phone)?;

        let customer = Customer {
            phone,
            name,
            created_at: Utc::now(),
        };

        debug!(phone = %customer.phone, "Registering customer");

        let inserted = sqlx::query("INSERT INTO customers (phone, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&customer.phone)
            .bind(&customer.name)
            .bind(customer.created_at)
            .execute(&self.pool)
            .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => Ok(customer),
            Err(DbError::UniqueViolation { .. }) => Err(CoreError::CustomerExists {
                phone: customer.phone,
            }
            .into()),
            Err(err) => Err(err),
        }
    }

    /// All customers, in registration order.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT phone, name, created_at FROM customers ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Customers whose name contains `query` (any case) or whose phone equals it.
    pub async fn find(&self, query: &str) -> DbResult<Vec<Customer>> {
        let query = validate_search_query(query)?;

        let found = self
            .list()
            .await?
            .into_iter()
            .filter(|customer| customer.matches(&query))
            .collect();

        Ok(found)
    }
}
