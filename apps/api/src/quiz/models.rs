use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Smallest and largest quiz the service will generate.
pub const MIN_QUESTIONS: u32 = 10;
pub const MAX_QUESTIONS: u32 = 20;

/// Form input exactly as submitted. Nothing here has been checked yet.
/// A missing or null topic/company is the same as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizInput {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub num_questions: i64,
}

#[cfg(test)]
impl RawQuizInput {
    pub fn new(topic: &str, company: &str, num_questions: i64) -> Self {
        Self {
            topic: Some(topic.to_string()),
            company: Some(company.to_string()),
            num_questions,
        }
    }
}

/// A validated request for one generation cycle. Strings are trimmed; an empty
/// string means "not given".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub company: String,
    pub num_questions: u32,
}

impl QuizRequest {
    pub fn topic(&self) -> Option<&str> {
        Some(self.topic.as_str()).filter(|t| !t.is_empty())
    }

    pub fn company(&self) -> Option<&str> {
        Some(self.company.as_str()).filter(|c| !c.is_empty())
    }
}

/// One interview question with three short hints and a suggested approach.
/// Fields missing from a completion deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Questions in presentation order.
pub type QuizResult = Vec<QuizQuestion>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    Transport,
    Parse,
    Busy,
}

/// Terminal outcome of a failed generation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// User-correctable input problem.
    #[error("{0}")]
    Validation(String),

    /// The completion service was unreachable or rejected the request.
    #[error("transport error: {message}")]
    Transport { status: Option<u16>, message: String },

    /// The completion service answered with something we could not interpret.
    #[error("parse error: {0}")]
    Parse(String),

    /// A submission arrived while another was still in flight.
    #[error("a quiz generation is already in progress")]
    Busy,
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Validation(_) => ErrorKind::Validation,
            GenerationError::Transport { .. } => ErrorKind::Transport,
            GenerationError::Parse(_) => ErrorKind::Parse,
            GenerationError::Busy => ErrorKind::Busy,
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::Transport {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Parse(err.to_string())
    }
}
