//! Defines the endpoint for recording a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::{Category, NewExpense, core::create_expense},
    user::UserID,
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The amount spent in dollars.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: Category,
    /// The date when the expense ocurred.
    pub date: Date,
    /// Text detailing the expense.
    #[serde(default)]
    pub description: String,
}

/// A route handler for recording a new expense.
///
/// The owner comes from the session token, never from the form. On success
/// the client is redirected to the expenses view so the table, charts and
/// summary are re-rendered from the database.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_expense = NewExpense {
        user_id,
        amount: form.amount,
        category: form.category,
        date: form.date,
        description: form.description,
    };

    if let Err(error) = create_expense(new_expense, &connection) {
        tracing::error!("could not create expense: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, body::Body, extract::State, http::Response, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use time::macros::date;

    use crate::expense::{
        Category,
        core::{get_expenses, test_utils::get_test_connection_and_user},
        create_endpoint::{CreateExpenseState, ExpenseForm},
        create_expense_endpoint,
    };

    #[tokio::test]
    async fn records_expense_for_session_user() {
        let (connection, user_id) = get_test_connection_and_user();
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let form = ExpenseForm {
            amount: 12.3,
            category: Category::Food,
            date: date!(2024 - 01 - 15),
            description: "lunch".to_string(),
        };

        let response = create_expense_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_redirects_to_expenses_view(response);

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses(user_id, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 12.3);
        assert_eq!(expenses[0].category, Category::Food);
        assert_eq!(expenses[0].date, date!(2024 - 01 - 15));
        assert_eq!(expenses[0].description, "lunch");
        assert_eq!(expenses[0].user_id, user_id);
    }

    #[tokio::test]
    async fn accepts_empty_description() {
        let (connection, user_id) = get_test_connection_and_user();
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let form = ExpenseForm {
            amount: 5.0,
            category: Category::Other,
            date: date!(2024 - 01 - 15),
            description: String::new(),
        };

        let response = create_expense_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_redirects_to_expenses_view(response);

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses(user_id, &connection).unwrap();
        assert_eq!(expenses[0].description, "");
    }

    #[track_caller]
    fn assert_redirects_to_expenses_view(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/expenses",
            "got redirect to {location:?}, want redirect to /expenses"
        );
    }
}
