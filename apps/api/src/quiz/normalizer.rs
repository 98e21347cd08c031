//! Response normalization: unwraps the Gemini envelope and reads the quiz payload.
//!
//! Envelope path: `candidates[0].content.parts[0].text`, which holds the JSON
//! document produced under the response schema. The schema is trusted: only a
//! syntax error in that document is a `Parse` error. A parseable payload that
//! is not an object, or has no `questions` array, degrades to an empty quiz.
//! Question fields that are missing come through empty; items that cannot be
//! read as a question at all are dropped and logged.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::RawCompletion;
use crate::quiz::models::{GenerationError, QuizQuestion, QuizResult};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Turns a raw completion into questions, or a `Parse` error when the envelope
/// or its payload cannot be interpreted.
pub fn normalize(raw: &RawCompletion) -> Result<QuizResult, GenerationError> {
    let envelope: GenerateContentResponse = serde_json::from_str(&raw.body)
        .map_err(|e| GenerationError::Parse(format!("invalid completion envelope: {e}")))?;

    let text = envelope
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.as_deref())
        .ok_or_else(|| {
            GenerationError::Parse("completion envelope has no candidate text".to_string())
        })?;

    let payload: Value = serde_json::from_str(strip_json_fences(text))?;

    let items: &[Value] = match payload.get("questions") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            warn!("Completion `questions` is not an array: {other}");
            &[]
        }
    };

    let questions: QuizResult = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match QuizQuestion::deserialize(item) {
            Ok(question) => Some(question),
            Err(e) => {
                warn!("Dropping unreadable question at index {i}: {e}");
                None
            }
        })
        .collect();
    debug!("Normalized {} questions from completion", questions.len());
    Ok(questions)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::models::ErrorKind;
    use serde_json::json;

    fn envelope(payload: &str) -> RawCompletion {
        RawCompletion {
            body: json!({
                "candidates": [
                    { "content": { "role": "model", "parts": [ { "text": payload } ] } }
                ],
                "usageMetadata": { "promptTokenCount": 120 }
            })
            .to_string(),
        }
    }

    #[test]
    fn test_single_question_payload() {
        let raw = envelope(
            r#"{"questions":[{"question":"Q","options":["a","b","c"],"answer":"A"}]}"#,
        );
        let result = normalize(&raw).unwrap();
        assert_eq!(
            result,
            vec![QuizQuestion {
                question: "Q".to_string(),
                options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                answer: "A".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_questions_key_yields_empty_result() {
        let result = normalize(&envelope(r#"{"items": []}"#)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_null_questions_yields_empty_result() {
        let result = normalize(&envelope(r#"{"questions": null}"#)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parseable_non_object_payload_yields_empty_result() {
        for payload in ["42", r#""text""#, "[1, 2]", "null"] {
            let result = normalize(&envelope(payload)).unwrap();
            assert!(result.is_empty(), "payload {payload} should degrade to empty");
        }
    }

    #[test]
    fn test_non_array_questions_yields_empty_result() {
        let result = normalize(&envelope(r#"{"questions": "soon"}"#)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_question_missing_options_passes_through() {
        let result =
            normalize(&envelope(r#"{"questions":[{"question":"Q","answer":"A"}]}"#)).unwrap();
        assert_eq!(
            result,
            vec![QuizQuestion {
                question: "Q".to_string(),
                options: vec![],
                answer: "A".to_string(),
            }]
        );
    }

    #[test]
    fn test_unreadable_question_items_are_dropped() {
        let result = normalize(&envelope(
            r#"{"questions":[
                "not a question",
                {"question":"Q","options":"a, b, c","answer":"A"},
                {"question":"Kept","options":["a","b","c"],"answer":"A"}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].question, "Kept");
    }

    #[test]
    fn test_invalid_payload_json_is_parse_error() {
        let err = normalize(&envelope("{not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_envelope_without_candidates_is_parse_error() {
        let raw = RawCompletion {
            body: r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#.to_string(),
        };
        let err = normalize(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("no candidate text"));
    }

    #[test]
    fn test_candidate_without_parts_is_parse_error() {
        let raw = RawCompletion {
            body: r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#.to_string(),
        };
        assert_eq!(normalize(&raw).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_non_json_envelope_is_parse_error() {
        let raw = RawCompletion {
            body: "<html>Bad Gateway</html>".to_string(),
        };
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("invalid completion envelope"));
    }

    #[test]
    fn test_fenced_payload_is_accepted() {
        let raw = envelope(
            "```json\n{\"questions\":[{\"question\":\"Q\",\"options\":[\"a\",\"b\",\"c\"],\"answer\":\"A\"}]}\n```",
        );
        assert_eq!(normalize(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        assert_eq!(strip_json_fences("```\n{\"key\": 1}\n```"), "{\"key\": 1}");
        assert_eq!(strip_json_fences("{\"key\": 1}"), "{\"key\": 1}");
    }
}
