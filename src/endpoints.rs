//! The API endpoint URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing summary figures and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying all transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for asking the assistant about your finances.
pub const ASSISTANT_VIEW: &str = "/assistant";

/// The route to list and create transactions as JSON.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route the assistant question form posts to.
pub const ASSISTANT_API: &str = "/api/assistant";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ASSISTANT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::ASSISTANT_API);
    }
}
