//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        cards::summary_cards,
        charts::{DashboardChart, category_pie_chart, charts_script, monthly_trend_chart},
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    report::aggregation::{category_totals, monthly_trend, summarize},
    transaction::get_all_transactions,
};

/// The URL the ECharts library is loaded from.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
///
/// The summary figures and both charts are recomputed from the full
/// transaction history on every request; nothing derived is stored.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let summary = summarize(&transactions);
    let cards = summary_cards(&summary);

    let charts = [
        DashboardChart {
            id: "category-chart",
            options: category_pie_chart(&category_totals(&transactions)).to_string(),
        },
        DashboardChart {
            id: "trend-chart",
            options: monthly_trend_chart(&monthly_trend(&transactions)).to_string(),
        },
    ];

    Ok(dashboard_view(nav_bar, &cards, &charts).into_response())
}

/// Renders the dashboard page when no transaction data exists.
///
/// Displays a helpful message with a link to add transactions.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

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
                "Summary figures and charts will show up here once you have
                some data. Start by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the headline cards and charts.
fn dashboard_view(nav_bar: NavBar, cards: &Markup, charts: &[DashboardChart]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (cards)

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let conn = get_test_connection();

        create_transaction(
            Transaction::build(TransactionKind::Income, 1000.0, date!(2024 - 01 - 05)),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 300.0, date!(2024 - 01 - 10))
                .category(Some("food".to_owned())),
            &conn,
        )
        .unwrap();

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;

        assert_chart_exists(&html, "category-chart");
        assert_chart_exists(&html, "trend-chart");

        // The headline figures are rendered from the same aggregation the
        // charts use.
        let text = html.html();
        assert!(text.contains("$1,000"));
        assert!(text.contains("$300"));
        assert!(text.contains("$700"));
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let conn = get_test_connection();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(html.html().contains("Nothing here yet"));

        let selector = Selector::parse("#charts").unwrap();
        assert!(html.select(&selector).next().is_none());
    }
}
