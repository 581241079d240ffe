//! Answering natural-language questions about the transaction history.
//!
//! The assistant builds a prompt from the full transaction list plus the
//! user's question, forwards it to a text-completion service, and renders
//! whatever comes back. Answers are shown as-is; there is no quality control
//! and no retry.

mod handlers;
mod prompt;
mod service;

pub use service::{CompletionService, GeminiClient};

pub(crate) use handlers::{get_assistant_page, post_assistant_question};
