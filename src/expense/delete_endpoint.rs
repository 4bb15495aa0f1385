//! Defines the endpoint for deleting an expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseID, core::delete_expense},
    user::UserID,
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, redirects to the expenses view on
/// success.
///
/// The delete is scoped to the session user, so an ID belonging to someone
/// else behaves exactly like a missing row and responds with a not-found
/// alert.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, user_id, &connection) {
        Ok(0) => Error::DeleteMissingExpense.into_alert_response(),
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_htmx::HX_REDIRECT;
    use time::macros::date;

    use crate::{
        PasswordHash,
        expense::{
            Category,
            core::{get_expenses, test_utils::get_test_connection_and_user, test_utils::insert_expense},
            delete_endpoint::DeleteExpenseState,
            delete_expense_endpoint,
        },
        user::create_user,
    };

    #[tokio::test]
    async fn deletes_own_expense_and_redirects() {
        let (connection, user_id) = get_test_connection_and_user();
        let expense = insert_expense(
            user_id,
            12.50,
            Category::Food,
            date!(2024 - 01 - 15),
            "lunch",
            &connection,
        );
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(expense.id),
        )
        .await
        .into_response();

        assert!(response.headers().contains_key(HX_REDIRECT));

        let connection = state.db_connection.lock().unwrap();
        assert!(get_expenses(user_id, &connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_expense_responds_with_not_found_alert() {
        let (connection, user_id) = get_test_connection_and_user();
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_expense_endpoint(State(state), Extension(user_id), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!response.headers().contains_key(HX_REDIRECT));
    }

    #[tokio::test]
    async fn cannot_delete_another_users_expense() {
        let (connection, user_id) = get_test_connection_and_user();
        let other_user = create_user("bob", PasswordHash::new_unchecked("hunter2"), &connection)
            .unwrap()
            .id;
        let expense = insert_expense(
            other_user,
            99.99,
            Category::Entertainment,
            date!(2024 - 01 - 15),
            "concert",
            &connection,
        );
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(expense.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expenses(other_user, &connection).unwrap().len(), 1);
    }
}
