use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendtrack::{PasswordHash, initialize_db};

/// A utility for creating a test database for the spendtrack server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test' with password 'test'...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;

    conn.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        ("test", password_hash.to_string()),
    )?;
    let user_id = conn.last_insert_rowid();

    println!("Adding sample expenses...");

    let today = OffsetDateTime::now_utc().date();
    let sample_expenses = [
        (12.50, "Food", 2, "Lunch at the deli"),
        (54.99, "Utilities", 5, "Power bill"),
        (23.00, "Travel", 9, "Train tickets"),
        (15.00, "Entertainment", 12, "Movie night"),
        (7.80, "Food", 33, "Groceries"),
        (9.99, "Other", 40, ""),
    ];

    for (amount, category, days_ago, description) in sample_expenses {
        let date = today - Duration::days(days_ago);
        conn.execute(
            "INSERT INTO expense (user_id, amount, category, date, description) \
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (user_id, amount, category, date, description),
        )?;
    }

    println!("Success!");

    Ok(())
}
