//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its kind enum, and `TransactionBuilder`
//! - Database functions for storing and listing transactions
//! - The JSON API endpoints and the transaction web pages

mod api;
mod core;
mod create_page;
mod transactions_page;

pub use self::core::{
    Transaction, TransactionBuilder, TransactionKind, create_transaction,
    create_transaction_table, get_all_transactions,
};

pub(crate) use api::{create_transaction_api_endpoint, get_transactions_api_endpoint};
pub(crate) use create_page::{create_transaction_endpoint, get_new_transaction_page};
pub(crate) use transactions_page::get_transactions_page;
