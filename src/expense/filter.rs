//! Category and date-range filtering over a user's expense list.
//!
//! The same filter drives the expense table, the analytics charts, the delete
//! candidates and the CSV export, so all four always agree on which rows are
//! in view.

use serde::Deserialize;
use time::Date;

use super::{category::Category, core::Expense};

/// The filter parameters as they arrive in the query string.
///
/// An unchecked checkbox simply omits its value and an untouched date input
/// submits an empty string, so both fields must tolerate being absent.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExpenseFilter {
    /// Keep only expenses in these categories. Empty means no category filter.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// The first day of the date range, inclusive.
    pub start_date: Option<Date>,
    /// The last day of the date range, inclusive.
    pub end_date: Option<Date>,
}

impl ExpenseFilter {
    /// The date range as an inclusive pair, if both endpoints were given.
    ///
    /// A single endpoint is treated as "no date filter", mirroring a
    /// half-filled date-range widget.
    pub fn date_range(&self) -> Option<(Date, Date)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Whether `expense` passes both the category and date filters.
    pub fn matches(&self, expense: &Expense) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&expense.category) {
            return false;
        }

        match self.date_range() {
            Some((start, end)) => start <= expense.date && expense.date <= end,
            None => true,
        }
    }
}

/// Keep only the expenses that pass `filter`, preserving order.
pub fn filter_expenses(expenses: Vec<Expense>, filter: &ExpenseFilter) -> Vec<Expense> {
    expenses
        .into_iter()
        .filter(|expense| filter.matches(expense))
        .collect()
}

/// Serialize `filter` back into a query string so that links (e.g. the CSV
/// export button) can carry the current filter along.
///
/// Returns an empty string when no filter is active.
pub fn filter_query_string(filter: &ExpenseFilter) -> String {
    let mut pairs: Vec<String> = filter
        .categories
        .iter()
        .map(|category| format!("categories={category}"))
        .collect();

    if let Some(start_date) = filter.start_date {
        pairs.push(format!("start_date={start_date}"));
    }

    if let Some(end_date) = filter.end_date {
        pairs.push(format!("end_date={end_date}"));
    }

    pairs.join("&")
}
