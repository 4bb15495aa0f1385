//! Expense aggregation for charts and summary tables.
//!
//! Provides functions to total expenses by calendar month and by category,
//! and to format month labels for chart axes.

use std::collections::HashMap;

use time::{Date, Month};

use crate::expense::{Category, Expense};

/// Totals expense amounts by calendar month.
///
/// Months are keyed by their first day and returned in chronological order.
/// Months with no expenses are simply absent.
pub fn monthly_totals(expenses: &[Expense]) -> Vec<(Date, f64)> {
    let mut totals: HashMap<Date, f64> = HashMap::new();

    for expense in expenses {
        // replace_day(1) cannot fail: every month has a first day.
        let month = expense.date.replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += expense.amount;
    }

    let mut sorted: Vec<_> = totals.into_iter().collect();
    sorted.sort_by_key(|(month, _)| *month);
    sorted
}

/// Totals expense amounts by category, largest first.
///
/// Categories with no expenses are absent. Ties keep the categories' display
/// order stable.
pub fn category_totals(expenses: &[Expense]) -> Vec<(Category, f64)> {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let mut sorted: Vec<_> = Category::ALL
        .into_iter()
        .filter_map(|category| totals.get(&category).map(|total| (category, *total)))
        .collect();
    sorted.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    sorted
}

/// Formats a month as a short label like "Jan 2024".
///
/// The year is always included since a filter can span year boundaries.
pub fn format_month_label(month: Date) -> String {
    let month_name = match month.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month_name} {}", month.year())
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::{
        expense::{Category, Expense},
        user::UserID,
    };

    use super::{category_totals, format_month_label, monthly_totals};

    fn make_expense(amount: f64, category: Category, date: time::Date) -> Expense {
        Expense {
            id: 1,
            user_id: UserID::new(1),
            amount,
            category,
            date,
            description: String::new(),
        }
    }

    #[test]
    fn monthly_totals_sums_within_each_month() {
        let expenses = vec![
            make_expense(100.0, Category::Food, date!(2024 - 01 - 15)),
            make_expense(50.0, Category::Travel, date!(2024 - 01 - 20)),
            make_expense(30.0, Category::Food, date!(2024 - 02 - 10)),
        ];

        let totals = monthly_totals(&expenses);

        assert_eq!(
            totals,
            vec![(date!(2024 - 01 - 01), 150.0), (date!(2024 - 02 - 01), 30.0)]
        );
    }

    #[test]
    fn monthly_totals_sorts_across_years() {
        let expenses = vec![
            make_expense(10.0, Category::Food, date!(2024 - 01 - 15)),
            make_expense(20.0, Category::Food, date!(2023 - 12 - 31)),
        ];

        let totals = monthly_totals(&expenses);

        assert_eq!(
            totals,
            vec![(date!(2023 - 12 - 01), 20.0), (date!(2024 - 01 - 01), 10.0)]
        );
    }

    #[test]
    fn monthly_totals_handles_empty_input() {
        assert!(monthly_totals(&[]).is_empty());
    }

    #[test]
    fn category_totals_sorts_largest_first() {
        let expenses = vec![
            make_expense(10.0, Category::Food, date!(2024 - 01 - 15)),
            make_expense(100.0, Category::Travel, date!(2024 - 01 - 16)),
            make_expense(5.0, Category::Food, date!(2024 - 01 - 17)),
            make_expense(40.0, Category::Other, date!(2024 - 01 - 18)),
        ];

        let totals = category_totals(&expenses);

        assert_eq!(
            totals,
            vec![
                (Category::Travel, 100.0),
                (Category::Other, 40.0),
                (Category::Food, 15.0),
            ]
        );
    }

    #[test]
    fn totals_conserve_the_overall_sum() {
        let expenses = vec![
            make_expense(12.5, Category::Food, date!(2024 - 01 - 15)),
            make_expense(30.0, Category::Travel, date!(2024 - 02 - 16)),
            make_expense(7.5, Category::Utilities, date!(2024 - 03 - 17)),
        ];
        let overall: f64 = expenses.iter().map(|expense| expense.amount).sum();

        let by_month: f64 = monthly_totals(&expenses)
            .iter()
            .map(|(_, total)| total)
            .sum();
        let by_category: f64 = category_totals(&expenses)
            .iter()
            .map(|(_, total)| total)
            .sum();

        assert_eq!(by_month, overall);
        assert_eq!(by_category, overall);
    }

    #[test]
    fn month_labels_include_the_year() {
        assert_eq!(format_month_label(date!(2024 - 01 - 01)), "Jan 2024");
        assert_eq!(format_month_label(date!(2023 - 12 - 01)), "Dec 2023");
    }
}
