//! Gemini question generator.
//!
//! Calls the Gemini `generateContent` REST endpoint and parses the
//! returned text into validated questions.
//!
//! # Example
//!
//! ```ignore
//! use logeek_models::providers::GeminiGenerator;
//!
//! let generator = GeminiGenerator::new("AIza...".to_string())
//!     .with_model("gemini-2.5-pro");
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::QuestionGenerator;
use crate::error::GenerateError;
use crate::prompt::quiz_prompt;
use crate::types::{QuizRequest, RawQuestion};

/// Default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for quiz generation.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// ────────────────────────────────────────────────────────────────────────────
// Gemini API Request/Response Types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for the `generateContent` endpoint.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Response envelope from the `generateContent` endpoint.
///
/// Only the fields the generator reads are modeled; the envelope itself
/// is not subject to the strict question-payload validation.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Question generator backed by the Gemini API.
pub struct GeminiGenerator {
    base_url: String,
    model: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a generator with the default base URL and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: SecretString::from(api_key.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Override the model (e.g., "gemini-2.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Classify a non-success HTTP status into a [`GenerateError`].
    fn classify_status(status: reqwest::StatusCode, body: &str) -> GenerateError {
        if status.as_u16() == 429 || body.to_uppercase().contains("RESOURCE_EXHAUSTED") {
            return GenerateError::QuotaExceeded;
        }
        if status.as_u16() == 503 {
            return GenerateError::Unavailable(
                "the model is experiencing high traffic, try again later".to_string(),
            );
        }
        GenerateError::Request(format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &QuizRequest) -> Result<Vec<RawQuestion>, GenerateError> {
        let prompt = quiz_prompt(request);
        debug!(
            topic = %request.topic,
            count = request.count,
            model = %self.model,
            "requesting quiz generation"
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "gemini request rejected");
            return Err(Self::classify_status(status, &body));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Malformed(format!("invalid response envelope: {e}")))?;

        let text = envelope
            .text()
            .ok_or_else(|| GenerateError::Malformed("response contained no text".to_string()))?;

        let questions = crate::types::parse_questions(&text)?;
        debug!(generated = questions.len(), "quiz generation succeeded");
        Ok(questions)
    }
}
