//! The assistant page and the endpoint that answers questions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    assistant::{prompt::build_prompt, service::CompletionService},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    navigation::NavBar,
    transaction::get_all_transactions,
};

/// The state needed for answering assistant questions.
#[derive(Clone)]
pub struct AssistantState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The completion service that answers the assembled prompt.
    pub completion_service: Arc<dyn CompletionService>,
}

impl FromRef<AppState> for AssistantState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            completion_service: state.completion_service.clone(),
        }
    }
}

/// The form data for an assistant question.
#[derive(Debug, Deserialize)]
pub struct AssistantForm {
    /// The user's question about their finances.
    pub question: String,
}

/// Renders the page for asking the assistant about your finances.
pub async fn get_assistant_page() -> Markup {
    let nav_bar = NavBar::new(endpoints::ASSISTANT_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-screen-md
            text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-semibold my-4" { "Assistant" }

            p class="mb-4 text-sm text-gray-600 dark:text-gray-400"
            {
                "Ask a question about your finances. Your transaction history
                is sent along with the question."
            }

            form
                hx-post=(endpoints::ASSISTANT_API)
                hx-target="#assistant-answer"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class="w-full space-y-4"
            {
                div
                {
                    label for="question" class=(FORM_LABEL_STYLE) { "Question" }
                    input
                        type="text"
                        name="question"
                        id="question"
                        placeholder="e.g. How much did I spend on food last month?"
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Ask" }
            }

            div id="assistant-answer" class="w-full mt-6" {}
        }
    );

    base("Assistant", &[], &content)
}

/// Answers a question about the user's finances.
///
/// Builds a prompt from the full transaction history and the question,
/// forwards it to the completion service, and renders the answer. A failure
/// anywhere yields an error alert, never a partial answer.
pub async fn post_assistant_question(
    State(state): State<AssistantState>,
    Form(form): Form<AssistantForm>,
) -> Response {
    let question = form.question.trim();
    if question.is_empty() {
        return Error::EmptyQuestion.into_alert_response();
    }

    // The database lock must be released before awaiting the completion
    // service, so the prompt is assembled in its own scope.
    let prompt = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        let transactions = match get_all_transactions(&connection) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("could not get transactions: {error}");
                return error.into_alert_response();
            }
        };

        match build_prompt(&transactions, question) {
            Ok(prompt) => prompt,
            Err(error) => return error.into_alert_response(),
        }
    };

    match state.completion_service.complete(&prompt).await {
        Ok(answer) => answer_view(&answer).into_response(),
        Err(error) => {
            tracing::error!("completion service failure: {error}");
            error.into_alert_response()
        }
    }
}

/// Renders the assistant's answer for the answer container.
fn answer_view(answer: &str) -> Markup {
    html!(
        div class="p-4 bg-white dark:bg-gray-800 border border-gray-200
            dark:border-gray-700 rounded-lg shadow whitespace-pre-line"
        {
            (answer)
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{body::Body, extract::State, http::Response, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        assistant::service::CompletionService,
        db::initialize,
        endpoints,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{AssistantForm, AssistantState, get_assistant_page, post_assistant_question};

    /// A completion service that replies with a fixed answer and records the
    /// prompt it was given.
    struct ScriptedCompletionService {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletionService {
        async fn complete(&self, prompt: &str) -> Result<String, Error> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            Ok(self.answer.clone())
        }
    }

    struct FailingCompletionService;

    #[async_trait]
    impl CompletionService for FailingCompletionService {
        async fn complete(&self, _prompt: &str) -> Result<String, Error> {
            Err(Error::CompletionService("connection refused".to_owned()))
        }
    }

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn answers_with_the_completion_service_response() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 300.0, date!(2024 - 01 - 10))
                .category(Some("food".to_owned())),
            &conn,
        )
        .unwrap();

        let service = Arc::new(ScriptedCompletionService {
            answer: "You spent $300 on food.".to_owned(),
            prompts: Mutex::new(Vec::new()),
        });
        let state = AssistantState {
            db_connection: Arc::new(Mutex::new(conn)),
            completion_service: service.clone(),
        };

        let form = AssistantForm {
            question: "How much did I spend on food?".to_owned(),
        };
        let response = post_assistant_question(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("You spent $300 on food."));

        // The prompt carried the stored transaction and the question.
        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"category\": \"food\""));
        assert!(prompts[0].contains("How much did I spend on food?"));
    }

    #[tokio::test]
    async fn rejects_an_empty_question() {
        let state = AssistantState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            completion_service: Arc::new(ScriptedCompletionService {
                answer: "unused".to_owned(),
                prompts: Mutex::new(Vec::new()),
            }),
        };

        let form = AssistantForm {
            question: "   ".to_owned(),
        };
        let response = post_assistant_question(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn service_failures_surface_as_an_error_alert() {
        let state = AssistantState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            completion_service: Arc::new(FailingCompletionService),
        };

        let form = AssistantForm {
            question: "Am I saving enough?".to_owned(),
        };
        let response = post_assistant_question(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("connection refused"));
    }

    #[tokio::test]
    async fn page_contains_the_question_form() {
        let html = get_assistant_page().await.into_string();

        assert!(html.contains(&format!("hx-post=\"{}\"", endpoints::ASSISTANT_API)));
        assert!(html.contains("id=\"assistant-answer\""));
    }
}
