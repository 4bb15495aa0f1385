//! Analytics module
//!
//! Aggregates a user's filtered expenses into monthly and per-category
//! summaries, and renders them as charts and tables for the expenses view.

pub mod aggregation;
pub mod charts;
pub mod tables;

pub use charts::{ECHARTS_SCRIPT_URL, ExpenseChart, build_expense_charts, charts_script};
pub use tables::category_summary_table;
