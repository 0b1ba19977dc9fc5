//! # Customer Commands

use shopkeep_core::Customer;
use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;

/// Registers a customer. The phone number must not be registered yet.
pub async fn add_customer(state: &AppState, name: &str, phone: &str) -> AppResult<Customer> {
    let customer = state.db().customers().add(name, phone).await?;

    info!(phone = %customer.phone, "Customer added");
    Ok(customer)
}

/// Every customer whose name contains `query` (any case) or whose phone
/// equals it, in registration order. An empty result is not an error.
pub async fn find_customers(state: &AppState, query: &str) -> AppResult<Vec<Customer>> {
    Ok(state.db().customers().find(query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::memory_state;

    #[tokio::test]
    async fn test_duplicate_phone_is_rejected() {
        let (state, _) = memory_state().await;
        add_customer(&state, "Asha", "9876543210").await.unwrap();

        let err = add_customer(&state, "Someone Else", "9876543210")
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::AlreadyExists));
        assert_eq!(err.message, "Customer already exists: 9876543210");
    }

    #[tokio::test]
    async fn test_find_by_name_or_phone() {
        let (state, _) = memory_state().await;
        add_customer(&state, "Asha Verma", "111").await.unwrap();
        add_customer(&state, "Ravi Verma", "222").await.unwrap();

        let both = find_customers(&state, "verma").await.unwrap();
        let phones: Vec<&str> = both.iter().map(|c| c.phone.as_str()).collect();
        assert_eq!(phones, vec!["111", "222"]);

        let one = find_customers(&state, "222").await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "Ravi Verma");

        assert!(find_customers(&state, "nobody").await.unwrap().is_empty());
        assert!(find_customers(&state, " ").await.is_err());
    }
}
