//! Finsight is a web app for keeping track of your income and expenses.
//!
//! It stores transactions in SQLite, serves a server-rendered dashboard with
//! summary figures and charts, and can answer questions about your finances
//! by forwarding your transaction history to a text-completion service.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod assistant;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod report;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use assistant::{CompletionService, GeminiClient};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionKind, create_transaction, get_all_transactions,
};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A negative amount was used to create a transaction.
    ///
    /// Transaction amounts are unsigned; whether money came in or went out is
    /// recorded by the transaction kind, not by the sign of the amount.
    #[error("transaction amounts must be zero or greater, got {0}")]
    NegativeAmount(f64),

    /// A stored or submitted transaction date could not be parsed as a
    /// calendar date.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error. This error is fatal for the request that
    /// hit it; dates are never silently coerced.
    #[error("could not parse transaction date \"{1}\": {0}")]
    InvalidDate(String, String),

    /// An empty question was submitted to the assistant.
    #[error("the assistant question cannot be empty")]
    EmptyQuestion,

    /// The completion service could not produce an answer.
    ///
    /// The string holds the underlying failure message. The request that
    /// triggered the call fails as a whole; there is no retry or fallback.
    #[error("the completion service failed: {0}")]
    CompletionService(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            Error::CompletionService(message) => {
                tracing::error!("completion service failure: {message}");
                InternalServerError {
                    description: "The assistant is unavailable.",
                    fix: "Try again later or check the server logs",
                }
                .into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction amount".to_owned(),
                    details: format!(
                        "Amounts must be zero or greater, got {amount}. Record money going out \
                        as an expense instead of a negative amount."
                    ),
                },
            ),
            Error::InvalidDate(error, date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!("Could not parse \"{date}\" as a calendar date: {error}"),
                },
            ),
            Error::EmptyQuestion => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Empty question".to_owned(),
                    details: "Type a question about your finances and try again.".to_owned(),
                },
            ),
            Error::CompletionService(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "The assistant could not answer".to_owned(),
                    details: message,
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Sorry, something went wrong.".to_owned(),
                        details: "Try again later or check the server logs.".to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
