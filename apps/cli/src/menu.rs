//! # Text Menu
//!
//! Prompts the operator, calls into [`crate::commands`] and prints the
//! outcome. Generic over the input and output streams so tests can script a
//! whole session.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  print menu ──► "Enter choice: " ──► dispatch                           │
//! │       ▲                                  │                              │
//! │       │            Ok ◄──────────────────┤                              │
//! │       │            Err(e) ──► "❌ {e.message}"                          │
//! │       └──────────────────────────────────┘                              │
//! │                                                                         │
//! │  "10" or end of input ──► return                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use shopkeep_core::{Money, PaymentStatus};
use tracing::debug;

use crate::commands::{bill, customer, product, report, sale};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::state::AppState;

const ITEMS: [&str; 10] = [
    "Add Product",
    "Update Product",
    "View Inventory",
    "Process Sale",
    "Find Bill",
    "Generate Annual Report",
    "Add Customer",
    "Find Customer",
    "Update Payment Status",
    "Exit",
];

pub struct Menu<'a, R, W> {
    state: &'a AppState,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(state: &'a AppState, input: R, output: W) -> Self {
        Menu {
            state,
            input,
            output,
        }
    }

    /// Runs until the operator picks Exit or input ends.
    ///
    /// Command failures are printed and the loop continues; only a failure
    /// to write to the output stream is returned.
    pub async fn run(&mut self) -> AppResult<()> {
        loop {
            self.print_menu()?;

            let choice = match self.prompt("Enter choice: ") {
                Ok(choice) => choice,
                Err(e) if e.is(ErrorCode::InputClosed) => break,
                Err(e) => return Err(e),
            };

            let outcome = match choice.trim() {
                "1" => self.add_product().await,
                "2" => self.update_product().await,
                "3" => self.view_inventory().await,
                "4" => self.process_sale().await,
                "5" => self.find_bill().await,
                "6" => self.annual_report().await,
                "7" => self.add_customer().await,
                "8" => self.find_customer().await,
                "9" => self.update_payment_status().await,
                "10" => break,
                other => Err(AppError::validation(format!(
                    "Invalid choice '{}', enter a number from 1 to 10",
                    other
                ))),
            };

            match outcome {
                Ok(()) => {}
                Err(e) if e.is(ErrorCode::InputClosed) => break,
                Err(e) => self.fail(&e)?,
            }
        }

        debug!("Menu closed");
        Ok(())
    }

    // =========================================================================
    // Terminal I/O
    // =========================================================================

    fn print_menu(&mut self) -> AppResult<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "===== {} =====",
            self.state.store().name.to_uppercase()
        )?;
        for (i, item) in ITEMS.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, item)?;
        }
        Ok(())
    }

    /// Prints `label` and reads one line without its line ending.
    fn prompt(&mut self, label: &str) -> AppResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::input_closed());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_whole(&mut self, label: &str, field: &str) -> AppResult<i64> {
        let raw = self.prompt(label)?;
        raw.trim()
            .parse()
            .map_err(|_| AppError::validation(format!("{} must be a whole number", field)))
    }

    fn prompt_money(&mut self, label: &str) -> AppResult<Money> {
        Ok(self.prompt(label)?.parse()?)
    }

    fn say(&mut self, message: &str) -> AppResult<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn fail(&mut self, err: &AppError) -> AppResult<()> {
        writeln!(self.output, "❌ {}", err.message)?;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn add_product(&mut self) -> AppResult<()> {
        let name = self.prompt("Enter product name: ")?;
        let stock = self.prompt_whole("Enter stock quantity: ", "Stock quantity")?;
        let price = self.prompt_money("Enter product price: ")?;

        product::add_product(self.state, &name, stock, price).await?;
        self.say("✅ Product added/updated successfully!")
    }

    async fn update_product(&mut self) -> AppResult<()> {
        let name = self.prompt("Enter product name to update: ")?;
        let current = product::get_product(self.state, &name).await?;
        self.say(&format!(
            "Current Stock: {}, Current Price: {}",
            current.stock,
            current.price()
        ))?;

        let stock = self.prompt_whole("Enter new stock: ", "Stock")?;
        let price = self.prompt_money("Enter new price: ")?;

        product::update_product(self.state, &current.name, stock, price).await?;
        self.say("✅ Product updated successfully!")
    }

    async fn view_inventory(&mut self) -> AppResult<()> {
        let products = product::list_inventory(self.state).await?;
        writeln!(self.output, "\n========== Inventory ==========")?;
        write!(self.output, "{}", product::inventory_table(&products))?;
        Ok(())
    }

    // =========================================================================
    // Sales
    // =========================================================================

    async fn process_sale(&mut self) -> AppResult<()> {
        let name = self.prompt("Enter customer name: ")?;
        let phone = self.prompt("Enter phone number: ")?;
        let mut checkout = sale::begin_sale(self.state, &name, &phone).await?;

        loop {
            let product_name = self.prompt("Enter product name (or 'done' to finish): ")?;
            if product_name.trim().eq_ignore_ascii_case("done") {
                break;
            }
            if checkout.remaining(&product_name).is_none() {
                self.say("❌ Product not found!")?;
                continue;
            }

            let quantity = match self.prompt_whole("Enter quantity: ", "Quantity") {
                Ok(quantity) => quantity,
                Err(e) if e.is(ErrorCode::InputClosed) => return Err(e),
                Err(e) => {
                    self.fail(&e)?;
                    continue;
                }
            };

            match checkout.request(&product_name, quantity) {
                Ok(_) => self.say("✅ Item added to cart.")?,
                Err(e) => self.fail(&e.into())?,
            }
        }

        checkout.ensure_not_empty()?;

        let status = loop {
            let raw = self.prompt("Payment Status (Paid/Unpaid): ")?;
            match raw.parse::<PaymentStatus>() {
                Ok(status) => break status,
                Err(e) => self.fail(&e.into())?,
            }
        };

        let completed = sale::complete_sale(self.state, &checkout, status).await?;
        write!(self.output, "{}", completed.receipt)?;
        self.say(&format!("✅ Bill saved: {}", completed.location))
    }

    async fn find_bill(&mut self) -> AppResult<()> {
        let query = self.prompt("Enter Name, Serial No., Phone, or Date: ")?;
        let found = bill::find_bill(self.state, &query).await?;
        write!(self.output, "{}", found.receipt)?;
        Ok(())
    }

    async fn annual_report(&mut self) -> AppResult<()> {
        let report = report::generate_report(self.state).await?;
        writeln!(self.output)?;
        write!(self.output, "{}", report::render_report(self.state, &report))?;
        Ok(())
    }

    async fn update_payment_status(&mut self) -> AppResult<()> {
        let bill_no = self.prompt("Enter the bill number to update payment status: ")?;
        let status = self.prompt("Enter new payment status (Paid/Unpaid): ")?;

        bill::update_payment_status(self.state, &bill_no, &status).await?;
        self.say("✅ Payment status updated successfully!")
    }

    // =========================================================================
    // Customers
    // =========================================================================

    async fn add_customer(&mut self) -> AppResult<()> {
        let name = self.prompt("Enter customer name: ")?;
        let phone = self.prompt("Enter customer phone: ")?;

        customer::add_customer(self.state, &name, &phone).await?;
        self.say("✅ Customer added successfully!")
    }

    async fn find_customer(&mut self) -> AppResult<()> {
        let query = self.prompt("Enter customer name or phone: ")?;
        let found = customer::find_customers(self.state, &query).await?;

        if found.is_empty() {
            return self.say("❌ No matching customer found!");
        }
        for c in &found {
            self.say(&format!("Customer Found: Name: {}, Phone: {}", c.name, c.phone))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::add_product;
    use crate::state::testing::memory_state;
    use std::io::Cursor;

    async fn session(state: &AppState, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(state, Cursor::new(script.as_bytes()), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_menu_lists_ten_items_and_exits() {
        let (state, _) = memory_state().await;
        let out = session(&state, "10\n").await;

        assert!(out.contains("===== CORNER STORE ====="));
        assert!(out.contains("1. Add Product"));
        assert!(out.contains("10. Exit"));
        assert_eq!(out.matches("Enter choice: ").count(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_exits_cleanly() {
        let (state, _) = memory_state().await;
        let out = session(&state, "1\nRice\n").await;

        assert!(out.ends_with("Enter stock quantity: "));
        assert!(state.db().products().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_update_and_view_inventory() {
        let (state, _) = memory_state().await;
        let script = "1\nRice\n10\n55\n2\nrice\n8\n60.5\n3\n10\n";
        let out = session(&state, script).await;

        assert!(out.contains("✅ Product added/updated successfully!"));
        assert!(out.contains("Current Stock: 10, Current Price: 55.00"));
        assert!(out.contains("✅ Product updated successfully!"));
        assert!(out.contains("========== Inventory =========="));
        assert!(out.contains(&format!("{:<30} {:<10} 60.50", "Rice", "8")));
    }

    #[tokio::test]
    async fn test_errors_are_reported_and_loop_continues() {
        let (state, _) = memory_state().await;
        let out = session(&state, "2\nCoffee\n1\nTea\nlots\n42\n10\n").await;

        assert!(out.contains("❌ Product not found: Coffee"));
        assert!(out.contains("❌ Stock quantity must be a whole number"));
        assert!(out.contains("❌ Invalid choice '42'"));
        assert_eq!(out.matches("Enter choice: ").count(), 4);
    }

    #[tokio::test]
    async fn test_process_sale_session() {
        let (state, sink) = memory_state().await;
        add_product(&state, "Rice", 5, Money::from_cents(5500)).await.unwrap();

        let script = "4\nAsha\n111\nCoffee\nrice\n20\nrice\ntwo\nrice\n2\nDONE\nlater\npaid\n10\n";
        let out = session(&state, script).await;

        assert!(out.contains("❌ Product not found!"));
        assert!(out.contains("❌ Not enough stock available! Rice: 5 left, 20 requested"));
        assert!(out.contains("❌ Quantity must be a whole number"));
        assert_eq!(out.matches("✅ Item added to cart.").count(), 1);
        assert_eq!(out.matches("Payment Status (Paid/Unpaid): ").count(), 2);
        assert!(out.contains("THANK YOU! VISIT AGAIN"));
        assert!(out.contains("✅ Bill saved: memory:"));

        let sales = state.db().sales().list().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].status, PaymentStatus::Paid);
        assert_eq!(sales[0].total_cents, 11_000);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_sale_with_empty_cart_records_nothing() {
        let (state, _) = memory_state().await;
        add_product(&state, "Rice", 5, Money::from_cents(5500)).await.unwrap();

        let out = session(&state, "4\nAsha\n111\ndone\n10\n").await;

        assert!(out.contains("❌ No items in cart"));
        assert!(!out.contains("Payment Status (Paid/Unpaid): "));
        assert!(state.db().sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bill_lookup_and_status_update_session() {
        let (state, _) = memory_state().await;
        add_product(&state, "Tea", 3, Money::from_cents(12000)).await.unwrap();
        session(&state, "4\nRavi Kumar\n222\nTea\n1\ndone\nUnpaid\n10\n").await;

        let bill_no = state.db().sales().list().await.unwrap()[0].bill_no;
        let script = format!("5\nkumar\n9\n{}\nPaid\n9\n1\nPaid\n10\n", bill_no);
        let out = session(&state, &script).await;

        assert!(out.contains(&format!("Bill No: {}", bill_no)));
        assert!(out.contains("✅ Payment status updated successfully!"));
        assert!(out.contains("❌ Bill not found: 1"));

        let record = state.db().sales().get(bill_no).await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_customer_session() {
        let (state, _) = memory_state().await;
        let script = "7\nAsha Verma\n111\n7\nAsha Again\n111\n8\nverma\n8\nnobody\n10\n";
        let out = session(&state, script).await;

        assert!(out.contains("✅ Customer added successfully!"));
        assert!(out.contains("❌ Customer already exists: 111"));
        assert!(out.contains("Customer Found: Name: Asha Verma, Phone: 111"));
        assert!(out.contains("❌ No matching customer found!"));
    }
}
