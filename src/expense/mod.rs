//! Expense module
//!
//! Covers the expense table in the database, the filter applied to it, and
//! the HTTP endpoints for viewing, recording, deleting and exporting
//! expenses.

mod category;
pub(crate) mod core;
mod create_endpoint;
mod delete_endpoint;
mod export_endpoint;
mod expenses_page;
pub(crate) mod filter;
mod form;

pub use category::Category;
pub use core::{Expense, ExpenseID, NewExpense, create_expense_table};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use export_endpoint::export_expenses_endpoint;
pub use expenses_page::get_expenses_page;
pub use filter::ExpenseFilter;
