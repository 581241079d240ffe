//! Defines the core data models and database queries for transactions.

use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, db::DatabaseId};

/// The format transaction dates are stored and submitted in, e.g. "2024-01-05".
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brought money in or took money out.
///
/// Anything else found in the database is carried as [TransactionKind::Other]
/// so that a single odd row never breaks listing or aggregation; such rows
/// are simply left out of every total.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionKind {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
    /// A kind this application does not know about.
    Other(String),
}

impl TransactionKind {
    /// The kind as it is stored in the database and serialized to JSON.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for TransactionKind {
    fn from(value: &str) -> Self {
        match value {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => TransactionKind::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TransactionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = String::deserialize(deserializer)?;
        Ok(TransactionKind::from(kind.as_str()))
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money earned or spent. Always zero or greater; the
    /// direction of the money is carried by `kind`.
    pub amount: f64,
    /// The category the transaction belongs to, e.g. "food". Expenses
    /// without a category are reported under a shared bucket.
    pub category: Option<String>,
    /// When the transaction happened, at day precision.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// An optional free-text annotation.
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            date,
            category: None,
            note: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Category and note default to none. Pass the finished builder to
/// [create_transaction] to validate it and write the row.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// The amount of money earned or spent. Must be zero or greater.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, e.g. "food".
    pub category: Option<String>,
    /// An optional free-text annotation.
    pub note: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// Parse a stored or submitted date string, e.g. "2024-01-05".
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date.
/// Malformed dates are never coerced; the caller's request fails as a whole.
pub(crate) fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT)
        .map_err(|error| Error::InvalidDate(error.to_string(), text.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative or not a number,
/// - or [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount < 0.0 || builder.amount.is_nan() {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let id = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, amount, category, date, note)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )?
        .query_row(
            (
                builder.kind.as_str(),
                builder.amount,
                &builder.category,
                builder.date.to_string(),
                &builder.note,
            ),
            |row| row.get(0),
        )?;

    Ok(Transaction {
        id,
        kind: builder.kind,
        amount: builder.amount,
        category: builder.category,
        date: builder.date,
        note: builder.note,
    })
}

/// A transaction row as it comes out of SQLite, before the date has been
/// validated.
struct RawTransaction {
    id: DatabaseId,
    kind: String,
    amount: f64,
    category: Option<String>,
    date: String,
    note: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = Error;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: raw.id,
            kind: TransactionKind::from(raw.kind.as_str()),
            amount: raw.amount,
            category: raw.category,
            date: parse_date(&raw.date)?,
            note: raw.note,
        })
    }
}

/// Retrieve all transactions, oldest row first (insertion order).
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidDate] if a stored date cannot be parsed,
/// - or [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let raw_transactions = connection
        .prepare("SELECT id, kind, amount, category, date, note FROM \"transaction\" ORDER BY id")?
        .query_map([], |row| {
            Ok(RawTransaction {
                id: row.get(0)?,
                kind: row.get(1)?,
                amount: row.get(2)?,
                category: row.get(3)?,
                date: row.get(4)?,
                note: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<RawTransaction>, rusqlite::Error>>()?;

    raw_transactions
        .into_iter()
        .map(Transaction::try_from)
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT,
                date TEXT NOT NULL,
                note TEXT
                )",
        (),
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
