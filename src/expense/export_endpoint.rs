//! Defines the endpoint for exporting expenses as a CSV download.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
// axum_extra's Query collects repeated keys into a Vec and parses an empty
// string as None, which axum's Query does not.
use axum_extra::extract::Query;
use csv::WriterBuilder;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        Expense, ExpenseFilter,
        core::get_expenses,
        filter::filter_expenses,
    },
    user::UserID,
};

/// The file name the browser is told to save the export as.
const EXPORT_FILE_NAME: &str = "expenses.csv";

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that serves the session user's expenses as a CSV
/// attachment.
///
/// The export honours the same filter as the expenses view, so downloading
/// from a filtered page exports exactly the rows on screen. An empty result
/// still produces a header-only CSV.
pub async fn export_expenses_endpoint(
    State(state): State<ExportExpensesState>,
    Extension(user_id): Extension<UserID>,
    Query(filter): Query<ExpenseFilter>,
) -> Response {
    let expenses = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_expenses(user_id, &connection) {
            Ok(expenses) => expenses,
            Err(error) => {
                tracing::error!("could not read expenses for export: {error}");
                return error.into_response();
            }
        }
    };

    match expenses_to_csv(filter_expenses(expenses, &filter)) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not serialize expenses to CSV: {error}");
            error.into_response()
        }
    }
}

/// Render `expenses` as CSV text with a header row.
fn expenses_to_csv(expenses: Vec<Expense>) -> Result<String, Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(["id", "user_id", "amount", "category", "date", "description"])
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for expense in expenses {
        writer
            .write_record([
                expense.id.to_string(),
                expense.user_id.to_string(),
                expense.amount.to_string(),
                expense.category.to_string(),
                expense.date.to_string(),
                expense.description,
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod export_expenses_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        body::to_bytes,
        extract::State,
        http::{StatusCode, header},
        response::IntoResponse,
    };
    use axum_extra::extract::Query;
    use time::macros::date;

    use crate::expense::{
        Category, ExpenseFilter,
        core::test_utils::{get_test_connection_and_user, insert_expense},
        export_endpoint::ExportExpensesState,
        export_expenses_endpoint,
    };

    async fn get_csv_body(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn exports_all_columns_as_attachment() {
        let (connection, user_id) = get_test_connection_and_user();
        let expense = insert_expense(
            user_id,
            12.5,
            Category::Food,
            date!(2024 - 01 - 15),
            "lunch",
            &connection,
        );
        let state = ExportExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = export_expenses_endpoint(
            State(state),
            Extension(user_id),
            Query(ExpenseFilter::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"expenses.csv\""
        );

        let body = get_csv_body(response).await;
        let mut lines = body.lines();
        assert_eq!(
            lines.next(),
            Some("id,user_id,amount,category,date,description")
        );
        assert_eq!(
            lines.next(),
            Some(
                format!(
                    "{},{},12.5,Food,2024-01-15,lunch",
                    expense.id, expense.user_id
                )
                .as_str()
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn export_honours_the_filter() {
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
            date!(2024 - 01 - 16),
            "train",
            &connection,
        );
        let state = ExportExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let filter = ExpenseFilter {
            categories: vec![Category::Travel],
            ..Default::default()
        };

        let response =
            export_expenses_endpoint(State(state), Extension(user_id), Query(filter))
                .await
                .into_response();

        let body = get_csv_body(response).await;
        assert_eq!(body.lines().count(), 2);
        assert!(body.contains("Travel"));
        assert!(!body.contains("Food"));
    }

    #[tokio::test]
    async fn empty_result_exports_header_only() {
        let (connection, user_id) = get_test_connection_and_user();
        let state = ExportExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = export_expenses_endpoint(
            State(state),
            Extension(user_id),
            Query(ExpenseFilter::default()),
        )
        .await
        .into_response();

        let body = get_csv_body(response).await;
        assert_eq!(body.trim_end(), "id,user_id,amount,category,date,description");
    }
}
