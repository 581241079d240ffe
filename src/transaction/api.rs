//! Defines the JSON API for listing and creating transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    transaction::core::{
        Transaction, TransactionKind, create_transaction, get_all_transactions, parse_date,
    },
};

/// The state needed for the transactions JSON API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
///
/// The date comes in as a string and is validated before anything touches
/// the database. Unknown kinds are accepted and stored as-is; they simply
/// never show up in any total.
#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// The category the transaction belongs to, e.g. "food".
    #[serde(default)]
    pub category: Option<String>,
    /// When the transaction happened, e.g. "2024-01-05".
    pub date: String,
    /// An optional free-text annotation.
    #[serde(default)]
    pub note: Option<String>,
}

/// Returns all transactions as JSON, oldest row first.
pub async fn get_transactions_api_endpoint(State(state): State<TransactionApiState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return error_payload(Error::DatabaseLockError);
        }
    };

    match get_all_transactions(&connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => {
            tracing::error!("could not list transactions: {error}");
            error_payload(error)
        }
    }
}

/// Creates a transaction from a JSON body, returning the stored row.
pub async fn create_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    Json(request): Json<NewTransactionRequest>,
) -> Response {
    let date = match parse_date(&request.date) {
        Ok(date) => date,
        Err(error) => return error_payload(error),
    };

    let builder = Transaction::build(request.kind, request.amount, date)
        .category(request.category)
        .note(request.note);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return error_payload(Error::DatabaseLockError);
        }
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error_payload(error),
    }
}

/// Render an error as a JSON payload with the matching status code.
fn error_payload(error: Error) -> Response {
    let status_code = match &error {
        Error::NegativeAmount(_) | Error::InvalidDate(_, _) => StatusCode::BAD_REQUEST,
        Error::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status_code, Json(json!({ "error": error.to_string() }))).into_response()
}
