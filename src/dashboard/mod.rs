//! Dashboard module
//!
//! Provides an overview page showing income and expense totals alongside
//! charts of expenses per category and the monthly trend.

mod cards;
mod charts;
mod handlers;

pub(crate) use handlers::get_dashboard_page;
