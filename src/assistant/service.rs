//! The completion service the assistant forwards prompts to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A text-completion service that answers a fully assembled prompt.
///
/// The default implementation is [GeminiClient]; tests substitute scripted
/// fakes. A call either returns the full answer text or fails as a whole.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `prompt` to the service and return the answer text.
    ///
    /// # Errors
    /// Returns [Error::CompletionService] with the underlying failure message
    /// if the service cannot be reached or returns no usable answer.
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}

/// The base URL of the Google Generative Language API.
const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A client for the Google Generative Language API.
///
/// Constructed once at startup from the server configuration and shared by
/// all request handlers; each call is a single HTTP request with no retry.
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client that answers prompts with `model`, e.g. "gemini-pro".
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    fn request_url(&self) -> String {
        format!("{GEMINI_API_BASE_URL}/{}:generateContent", self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|error| Error::CompletionService(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::CompletionService(format!(
                "the completion service returned {status}"
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| Error::CompletionService(error.to_string()))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| Error::CompletionService("the response contained no answer".to_owned()))
    }
}
