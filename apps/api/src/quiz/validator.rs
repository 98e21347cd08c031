//! Input validation: the only gate between raw form input and the pipeline.

use crate::quiz::models::{GenerationError, QuizRequest, RawQuizInput, MAX_QUESTIONS, MIN_QUESTIONS};

/// Checks raw input against the domain rules. First failing rule wins:
/// 1. topic and company both blank
/// 2. question count outside [MIN_QUESTIONS, MAX_QUESTIONS]
pub fn validate(raw: &RawQuizInput) -> Result<QuizRequest, GenerationError> {
    let topic = raw.topic.as_deref().unwrap_or_default().trim();
    let company = raw.company.as_deref().unwrap_or_default().trim();

    if topic.is_empty() && company.is_empty() {
        return Err(GenerationError::Validation(
            "missing topic or company".to_string(),
        ));
    }

    let num_questions = u32::try_from(raw.num_questions)
        .ok()
        .filter(|n| (MIN_QUESTIONS..=MAX_QUESTIONS).contains(n))
        .ok_or_else(|| GenerationError::Validation("count out of range".to_string()))?;

    Ok(QuizRequest {
        topic: topic.to_string(),
        company: company.to_string(),
        num_questions,
    })
}
