/// LLM Client: the single point of entry for all Gemini API calls in Quizie.
///
/// ARCHITECTURAL RULE: No other module may call the completion service directly.
/// Callers depend on the `CompletionService` trait; `GeminiClient` is the live backend.
///
/// Model: gemini-2.5-flash-preview-05-20 (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

/// The model used for all completion calls in Quizie.
pub const MODEL: &str = "gemini-2.5-flash-preview-05-20";
const RESPONSE_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

impl LlmError {
    /// HTTP status of a rejected request, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            LlmError::Api { status, .. } => Some(*status),
        }
    }
}

/// Undecoded body of a successful completion call. Unwrapping the envelope is
/// the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion {
    pub body: String,
}

/// A completion service that answers a prompt with structured output
/// constrained by `response_schema`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, response_schema: &Value)
        -> Result<RawCompletion, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Wraps the Gemini `generateContent` endpoint. One call per request:
/// no retries and no timeout beyond reqwest's defaults.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            MODEL
        )
    }
}

fn build_request_body<'a>(prompt: &'a str, response_schema: &'a Value) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![GeminiContent {
            role: "user",
            parts: vec![GeminiPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: RESPONSE_MIME_TYPE,
            response_schema,
        },
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        response_schema: &Value,
    ) -> Result<RawCompletion, LlmError> {
        let request_body = build_request_body(prompt, response_schema);

        // A missing key is sent as empty; the service rejects it as a normal API error.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_deref().unwrap_or_default())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error (status {}): {}", status, body);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        debug!("Gemini call succeeded: {} response bytes", body.len());

        Ok(RawCompletion { body })
    }
}
