//! Defines the page for displaying all transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link},
    navigation::NavBar,
    transaction::core::{Transaction, TransactionKind, get_all_transactions},
};

/// The state needed for displaying the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page listing every recorded transaction.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);

    if transactions.is_empty() {
        return Ok(transactions_no_data_view(nav_bar).into_response());
    }

    Ok(transactions_view(nav_bar, &transactions).into_response())
}

/// Renders the transactions page when no transactions exist yet.
fn transactions_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding one");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your transactions will show up here. Start by " (new_transaction_link) "."
            }
        }
    );

    base("Transactions", &[], &content)
}

/// Renders the table of all transactions.
fn transactions_view(nav_bar: NavBar, transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-lg text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-semibold my-4" { "Transactions" }

            div class="overflow-x-auto rounded-lg shadow w-full"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        }
                    }
                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction))
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

/// Renders one transaction as a table row.
fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400",
        TransactionKind::Expense => "text-red-600 dark:text-red-400",
        TransactionKind::Other(_) => "text-gray-500 dark:text-gray-400",
    };

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.kind) }
            td class=(TABLE_CELL_STYLE) {
                (transaction.category.as_deref().unwrap_or("—"))
            }
            td class=(TABLE_CELL_STYLE) {
                (transaction.note.as_deref().unwrap_or(""))
            }
            td class={(TABLE_CELL_STYLE) " text-right font-medium " (amount_style)} {
                (format_currency(transaction.amount))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{TransactionsPageState, get_transactions_page};

    fn get_test_state() -> TransactionsPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[tokio::test]
    async fn lists_each_transaction_as_a_row() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Income, 1000.0, date!(2024 - 01 - 05)),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Expense, 300.0, date!(2024 - 01 - 10))
                    .category(Some("food".to_owned())),
                &connection,
            )
            .unwrap();
        }

        let response = get_transactions_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);
        assert!(html.html().contains("food"));
    }

    #[tokio::test]
    async fn prompts_the_user_when_there_are_no_transactions() {
        let state = get_test_state();

        let response = get_transactions_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        let table_selector = Selector::parse("table").unwrap();
        assert_eq!(html.select(&table_selector).count(), 0);
        assert!(html.html().contains("Nothing here yet"));
    }
}
