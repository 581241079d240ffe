//! Alert messages rendered into the page's alert container.

use maud::{Markup, html};

/// An alert shown to the user in place of a result.
pub enum Alert {
    /// Something went wrong with the user's request.
    Error {
        /// A short summary of what went wrong.
        message: String,
        /// More detail on the failure and what the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as markup for the alert container.
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Error { message, details } => html! {
                div
                    role="alert"
                    class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                        dark:bg-gray-800 dark:text-red-400 border border-red-300
                        dark:border-red-800"
                {
                    span class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            },
        }
    }
}
