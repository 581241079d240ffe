use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use finsight::{Transaction, TransactionKind, create_transaction, initialize_db};

/// A utility for creating a database with a few months of sample data.
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

    println!("Creating sample transactions...");

    let builders = [
        Transaction::build(TransactionKind::Income, 3500.0, date!(2024 - 01 - 01))
            .note(Some("Salary".to_owned())),
        Transaction::build(TransactionKind::Expense, 900.0, date!(2024 - 01 - 03))
            .category(Some("rent".to_owned())),
        Transaction::build(TransactionKind::Expense, 420.0, date!(2024 - 01 - 14))
            .category(Some("food".to_owned())),
        Transaction::build(TransactionKind::Expense, 150.0, date!(2024 - 01 - 21))
            .category(Some("transport".to_owned())),
        Transaction::build(TransactionKind::Income, 3500.0, date!(2024 - 02 - 01))
            .note(Some("Salary".to_owned())),
        Transaction::build(TransactionKind::Expense, 900.0, date!(2024 - 02 - 03))
            .category(Some("rent".to_owned())),
        Transaction::build(TransactionKind::Expense, 380.0, date!(2024 - 02 - 12))
            .category(Some("food".to_owned())),
        Transaction::build(TransactionKind::Expense, 60.0, date!(2024 - 02 - 17))
            .category(Some("entertainment".to_owned()))
            .note(Some("Cinema".to_owned())),
        Transaction::build(TransactionKind::Income, 3700.0, date!(2024 - 03 - 01))
            .note(Some("Salary plus bonus".to_owned())),
        Transaction::build(TransactionKind::Expense, 900.0, date!(2024 - 03 - 03))
            .category(Some("rent".to_owned())),
        Transaction::build(TransactionKind::Expense, 450.0, date!(2024 - 03 - 15))
            .category(Some("food".to_owned())),
        // Left uncategorized on purpose so the dashboard shows the
        // fallback bucket.
        Transaction::build(TransactionKind::Expense, 75.0, date!(2024 - 03 - 23)),
    ];

    for builder in builders {
        create_transaction(builder, &conn)?;
    }

    println!("Success!");

    Ok(())
}
