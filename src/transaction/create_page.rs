//! Defines the page and endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    transaction::core::{Transaction, TransactionKind, create_transaction, parse_date},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is an income or an expense.
    pub kind: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// The date when the transaction occurred, e.g. "2024-01-05".
    pub date: String,
    /// The category the transaction belongs to.
    #[serde(default)]
    pub category: Option<String>,
    /// An optional free-text annotation.
    #[serde(default)]
    pub note: Option<String>,
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-semibold my-4" { "New Transaction" }

            form
                method="post"
                action=(endpoints::TRANSACTIONS_VIEW)
                class="w-full space-y-4"
            {
                fieldset class="flex gap-6"
                {
                    label class="flex items-center gap-2"
                    {
                        input type="radio" name="kind" value="expense" checked;
                        "Expense"
                    }

                    label class="flex items-center gap-2"
                    {
                        input type="radio" name="kind" value="income";
                        "Income"
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        min="0"
                        step="1"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        type="text"
                        name="category"
                        id="category"
                        placeholder="e.g. food"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note" }
                    input
                        type="text"
                        name="note"
                        id="note"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    );

    base("New Transaction", &[], &content)
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let date = match parse_date(&form.date) {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

    let builder = Transaction::build(TransactionKind::from(form.kind.as_str()), form.amount, date)
        .category(form.category)
        .note(form.note);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(builder, &connection) {
        return error.into_alert_response();
    }

    Redirect::to(endpoints::TRANSACTIONS_VIEW).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{db::initialize, endpoints, transaction::get_all_transactions};

    use super::{
        CreateTransactionState, TransactionForm, create_transaction_endpoint,
        get_new_transaction_page,
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let form = TransactionForm {
            kind: "expense".to_owned(),
            amount: 300.0,
            date: "2024-01-10".to_owned(),
            category: Some("food".to_owned()),
            note: None,
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::TRANSACTIONS_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_all_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 300.0);
        assert_eq!(transactions[0].category.as_deref(), Some("food"));
    }

    #[tokio::test]
    async fn rejects_a_malformed_date() {
        let state = get_test_state();

        let form = TransactionForm {
            kind: "expense".to_owned(),
            amount: 300.0,
            date: "10/01/2024".to_owned(),
            category: None,
            note: None,
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_transactions(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn form_posts_to_the_transactions_route() {
        let html = get_new_transaction_page().await.into_string();

        assert!(html.contains(&format!("action=\"{}\"", endpoints::TRANSACTIONS_VIEW)));
    }
}
