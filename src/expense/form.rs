//! The add-expense form and the filter controls.

use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
};

use super::{category::Category, filter::ExpenseFilter};

/// The form fields for recording a new expense.
///
/// The amount widget enforces a minimum of zero and two-decimal steps on the
/// client side; the store itself does not validate amounts.
pub fn expense_form(today: Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::EXPENSES_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#add-expense-button"
            class="space-y-4 w-full"
        {
            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="category"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category"
                }

                select
                    name="category"
                    id="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option value=(category) { (category) }
                    }
                }
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit" id="add-expense-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Add Expense"
            }
        }
    }
}

/// The category multi-select and date-range controls.
///
/// Submitted as a GET form so the filter lives in the query string and
/// survives the full-page refresh that follows every mutation.
pub fn filter_form(filter: &ExpenseFilter) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            class="space-y-4 w-full"
        {
            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Filter by category" }

                div class="flex flex-wrap gap-x-4 gap-y-2"
                {
                    @for category in Category::ALL {
                        div class="flex items-center gap-x-2"
                        {
                            input
                                type="checkbox"
                                name="categories"
                                id={ "category-" (category) }
                                value=(category)
                                checked[filter.categories.contains(&category)]
                                class="rounded-xs";

                            label
                                for={ "category-" (category) }
                                class="text-sm font-medium text-gray-900 dark:text-white"
                            {
                                (category)
                            }
                        }
                    }
                }
            }

            div class="flex gap-x-4"
            {
                div class="flex-1"
                {
                    label
                        for="start_date"
                        class=(FORM_LABEL_STYLE)
                    {
                        "From"
                    }

                    input
                        name="start_date"
                        id="start_date"
                        type="date"
                        value=[filter.start_date]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex-1"
                {
                    label
                        for="end_date"
                        class=(FORM_LABEL_STYLE)
                    {
                        "To"
                    }

                    input
                        name="end_date"
                        id="end_date"
                        type="date"
                        value=[filter.end_date]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button
                type="submit" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                "Apply Filters"
            }
        }
    }
}
