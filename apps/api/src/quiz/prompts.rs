// Prompt constants and the instruction builder for quiz generation.
// All completion calls go through llm_client with the schema built here.

use serde_json::{json, Value};

use crate::quiz::models::QuizRequest;

pub const DEFAULT_TOPIC: &str = "general knowledge";
pub const DEFAULT_COMPANY: &str = "a leading tech company";

/// Quiz generation prompt template. Replace: {num_questions}, {topic}, {company}
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer preparing a candidate for a job interview.
Generate {num_questions} interview questions based on the following criteria:
- Topic/Skill: "{topic}"
- Company: "{company}"

For each question, provide:
1. A "question" that an interviewer would ask.
2. An array of exactly three "options" which are short, bullet-point hints for the candidate to consider.
3. An "answer" which is a short paragraph describing a suggested approach.

Return the output as a valid JSON object with a single key "questions" that contains an array of these question objects.
Example: {"questions": [{"question": "...", "options": ["...", "...", "..."], "answer": "..."}]}"#;

/// Natural-language directive plus the schema the completion service must honor.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub text: String,
    pub response_schema: Value,
}

/// Builds the instruction for a validated request. Same request, same bytes.
pub fn build(req: &QuizRequest) -> Instruction {
    let text = QUIZ_PROMPT_TEMPLATE
        .replace("{num_questions}", &req.num_questions.to_string())
        .replace("{topic}", req.topic().unwrap_or(DEFAULT_TOPIC))
        .replace("{company}", req.company().unwrap_or(DEFAULT_COMPANY));

    Instruction {
        text,
        response_schema: quiz_response_schema(),
    }
}

/// Gemini `responseSchema` for `{"questions": [{question, options[3], answer}]}`.
pub fn quiz_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "minItems": 3,
                            "maxItems": 3
                        },
                        "answer": { "type": "STRING" }
                    },
                    "required": ["question", "options", "answer"]
                }
            }
        },
        "required": ["questions"]
    })
}
