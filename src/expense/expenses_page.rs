//! Defines the route handler for the main expenses page.
//!
//! The page shows the entry form, the filter controls, the expense table and,
//! when the filtered list is non-empty, spending charts and a category
//! summary. Every mutation redirects back here so the whole page is always
//! re-rendered from the database.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// axum_extra's Query collects repeated keys into a Vec and parses an empty
// string as None, which axum's Query does not.
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    analytics::{ECHARTS_SCRIPT_URL, build_expense_charts, category_summary_table, charts_script},
    endpoints,
    expense::{
        Expense, ExpenseFilter,
        core::get_expenses,
        filter::{filter_expenses, filter_query_string},
        form::{expense_form, filter_form},
    },
    html::{
        BUTTON_DELETE_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    user::UserID,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesViewState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expenses page for the session user.
pub async fn get_expenses_page(
    State(state): State<ExpensesViewState>,
    Extension(user_id): Extension<UserID>,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;
    drop(connection);

    let filtered = filter_expenses(expenses, &filter);

    Ok(expenses_view(&filtered, &filter).into_response())
}

fn expenses_view(expenses: &[Expense], filter: &ExpenseFilter) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let today = OffsetDateTime::now_utc().date();
    let charts = if expenses.is_empty() {
        None
    } else {
        Some(build_expense_charts(expenses))
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="grid grid-cols-1 lg:grid-cols-2 gap-4 w-full max-w-screen-xl mb-4"
            {
                div class="bg-white rounded-lg shadow dark:bg-gray-800 p-6"
                {
                    h2 class="text-xl font-bold mb-4" { "Add Expense" }

                    (expense_form(today))
                }

                div class="bg-white rounded-lg shadow dark:bg-gray-800 p-6"
                {
                    h2 class="text-xl font-bold mb-4" { "Filters" }

                    (filter_form(filter))
                }
            }

            div class="w-full max-w-screen-xl mb-4"
            {
                (expense_table(expenses))
            }

            @if let Some(charts) = &charts {
                section
                    id="charts"
                    class="w-full max-w-screen-xl mx-auto mb-4"
                {
                    div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                    {
                        @for chart in charts {
                            div
                                id=(chart.id)
                                class="min-h-[380px] rounded dark:bg-gray-100"
                            {}
                        }

                        (category_summary_table(expenses))
                    }
                }
            }

            @if !expenses.is_empty() {
                p
                {
                    a
                        href=(export_url(filter))
                        class=(LINK_STYLE)
                    {
                        "Download as CSV"
                    }
                }
            }
        }
    );

    let scripts: Vec<HeadElement> = match &charts {
        Some(charts) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(charts.as_slice()),
        ],
        None => Vec::new(),
    };

    base("Expenses", &scripts, &content)
}

/// The export endpoint carrying the active filter, so the download matches
/// what is on screen.
fn export_url(filter: &ExpenseFilter) -> String {
    let query = filter_query_string(filter);

    if query.is_empty() {
        endpoints::EXPORT_API.to_owned()
    } else {
        format!("{}?{query}", endpoints::EXPORT_API)
    }
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Action" }
                    }
                }

                tbody
                {
                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5"
                            {
                                "No expenses to show. Add one above or widen the filters."
                            }
                        }
                    }

                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.date) }
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                button
                                    type="button"
                                    hx-delete=(endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                    hx-confirm="Delete this expense?"
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod expenses_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::expense::{
        Category, ExpenseFilter,
        core::test_utils::{get_test_connection_and_user, insert_expense},
        expenses_page::ExpensesViewState,
        get_expenses_page,
    };

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    fn count_elements(html: &Html, selector_string: &str) -> usize {
        let selector = Selector::parse(selector_string).unwrap();
        html.select(&selector).count()
    }

    #[tokio::test]
    async fn page_shows_forms_and_empty_table_without_expenses() {
        let (connection, user_id) = get_test_connection_and_user();
        let state = ExpensesViewState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_expenses_page(
            State(state),
            Extension(user_id),
            Query(ExpenseFilter::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        assert_valid_html(&html);

        assert_eq!(count_elements(&html, "input[name=amount]"), 1);
        assert_eq!(count_elements(&html, "input[name=start_date]"), 1);
        assert_eq!(count_elements(&html, "table"), 1);
        // No data, so no charts and no export link.
        assert_eq!(count_elements(&html, "#monthly-spending-chart"), 0);
        assert_eq!(count_elements(&html, "a[href^='/api/export']"), 0);
    }

    #[tokio::test]
    async fn page_lists_expenses_with_charts_and_summary() {
        let (connection, user_id) = get_test_connection_and_user();
        insert_expense(
            user_id,
            12.5,
            Category::Food,
            date!(2024 - 01 - 15),
            "lunch",
            &connection,
        );
        insert_expense(
            user_id,
            30.0,
            Category::Travel,
            date!(2024 - 02 - 16),
            "train",
            &connection,
        );
        let state = ExpensesViewState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_expenses_page(
            State(state),
            Extension(user_id),
            Query(ExpenseFilter::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        assert_valid_html(&html);

        assert_eq!(count_elements(&html, "tbody tr"), 2);
        assert_eq!(count_elements(&html, "button[hx-delete]"), 2);
        assert_eq!(count_elements(&html, "#monthly-spending-chart"), 1);
        assert_eq!(count_elements(&html, "#category-spending-chart"), 1);
        assert_eq!(count_elements(&html, "a[href='/api/export']"), 1);
    }

    #[tokio::test]
    async fn page_applies_the_filter() {
        let (connection, user_id) = get_test_connection_and_user();
        insert_expense(
            user_id,
            12.5,
            Category::Food,
            date!(2024 - 01 - 15),
            "lunch",
            &connection,
        );
        insert_expense(
            user_id,
            30.0,
            Category::Travel,
            date!(2024 - 02 - 16),
            "train",
            &connection,
        );
        let state = ExpensesViewState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let filter = ExpenseFilter {
            categories: vec![Category::Travel],
            ..Default::default()
        };

        let response = get_expenses_page(State(state), Extension(user_id), Query(filter))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert_eq!(count_elements(&html, "tbody tr"), 1);
        // The export link carries the filter.
        assert_eq!(
            count_elements(&html, "a[href='/api/export?categories=Travel']"),
            1
        );
    }

    #[tokio::test]
    async fn filtering_everything_out_shows_empty_state() {
        let (connection, user_id) = get_test_connection_and_user();
        insert_expense(
            user_id,
            12.5,
            Category::Food,
            date!(2024 - 01 - 15),
            "lunch",
            &connection,
        );
        let state = ExpensesViewState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let filter = ExpenseFilter {
            categories: vec![Category::Entertainment],
            ..Default::default()
        };

        let response = get_expenses_page(State(state), Extension(user_id), Query(filter))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert_eq!(count_elements(&html, "button[hx-delete]"), 0);
        assert_eq!(count_elements(&html, "#monthly-spending-chart"), 0);
    }
}
