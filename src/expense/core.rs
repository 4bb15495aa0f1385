//! The expense table and the store operations over it.

use rusqlite::Connection;
use time::Date;

use crate::{Error, user::UserID};

use super::category::Category;

/// Alias for the integer type used for expense row IDs.
pub type ExpenseID = i64;

/// A single expense record belonging to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The expense's ID in the application database.
    pub id: ExpenseID,
    /// The user that recorded this expense.
    pub user_id: UserID,
    /// How much money was spent. Never negative.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: Category,
    /// When the expense happened.
    pub date: Date,
    /// A text description of what the expense was for. May be empty.
    pub description: String,
}

/// The data needed to insert a new expense row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The user recording the expense.
    pub user_id: UserID,
    /// How much money was spent.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: Category,
    /// When the expense happened.
    pub date: Date,
    /// A text description of what the expense was for.
    pub description: String,
}

/// Create the expense table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id),
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new expense into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, amount, category, date, description) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            expense.user_id.as_i64(),
            expense.amount,
            expense.category,
            expense.date,
            &expense.description,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        user_id: expense.user_id,
        amount: expense.amount,
        category: expense.category,
        date: expense.date,
        description: expense.description,
    })
}

/// Get all expenses recorded by `user_id`, in insertion order (ascending ID).
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, category, date, description FROM expense \
            WHERE user_id = :user_id \
            ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(Expense {
                id: row.get(0)?,
                user_id: UserID::new(row.get(1)?),
                amount: row.get(2)?,
                category: row.get(3)?,
                date: row.get(4)?,
                description: row.get(5)?,
            })
        })?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

type RowsAffected = usize;

/// Delete the expense with ID `expense_id` if it is owned by `user_id`.
///
/// The delete statement filters on both the row ID and the owner, so a user
/// cannot delete another user's expenses even with a known ID. Returns the
/// number of rows affected; zero means the row does not exist or belongs to
/// someone else.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn delete_expense(
    expense_id: ExpenseID,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM expense WHERE id = :id AND user_id = :user_id",
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
        )
        .map_err(|err| err.into())
}
