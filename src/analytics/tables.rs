//! Table views for expense summaries.

use maud::{Markup, html};

use crate::{
    analytics::aggregation::category_totals,
    expense::Expense,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// Renders a table of per-category totals for the filtered expenses, largest
/// category first, with an overall total in the footer.
///
/// Renders nothing when there are no expenses.
pub fn category_summary_table(expenses: &[Expense]) -> Markup {
    let totals = category_totals(expenses);

    if totals.is_empty() {
        return html! {};
    }

    let overall: f64 = totals.iter().map(|(_, total)| total).sum();

    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Spending by Category" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        }
                    }
                    tbody
                    {
                        @for (category, total) in &totals {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (category) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(*total)) }
                            }
                        }
                    }
                    tfoot
                    {
                        tr class="font-semibold text-gray-900 dark:text-white"
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                            td class=(TABLE_CELL_STYLE) { (format_currency(overall)) }
                        }
                    }
                }
            }
        }
    }
}
