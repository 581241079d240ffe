//! Builds the natural-language prompt sent to the completion service.

use serde::Serialize;

use crate::{Error, transaction::Transaction};

/// A transaction as it is shown to the completion service.
///
/// Dates are reduced to plain calendar-date strings and the database ID is
/// left out.
#[derive(Serialize)]
struct PromptTransaction<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    amount: f64,
    category: Option<&'a str>,
    date: String,
    note: Option<&'a str>,
}

/// Assembles the prompt: the transaction history as JSON followed by the
/// user's question.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the history cannot be
/// serialized.
pub(crate) fn build_prompt(transactions: &[Transaction], question: &str) -> Result<String, Error> {
    let rows: Vec<PromptTransaction> = transactions
        .iter()
        .map(|transaction| PromptTransaction {
            kind: transaction.kind.as_str(),
            amount: transaction.amount,
            category: transaction.category.as_deref(),
            date: transaction.date.to_string(),
            note: transaction.note.as_deref(),
        })
        .collect();

    let data = serde_json::to_string_pretty(&rows)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(format!(
        "You are a financial assistant AI. Answer the user's question based on \
        their transaction data.\n\
        Here is the user's transaction data in JSON format:\n\
        {data}\n\n\
        User's question: {question}\n\n\
        Provide a helpful, concise response."
    ))
}
