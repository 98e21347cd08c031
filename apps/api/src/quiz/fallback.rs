//! Template fallback: deterministic, offline quiz generation.
//!
//! Cycles through five fixed templates, suffixing each question with its
//! 1-based position so repeated cycles stay distinct. A fixed delay stands in
//! for the latency of the live path.

use std::time::Duration;

use tracing::info;

use crate::quiz::models::{QuizQuestion, QuizRequest, QuizResult};

/// Latency the fallback path simulates unless configured otherwise.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(2000);

/// A question template: `(topic, company) -> (question, options, answer)`.
struct Template {
    question: fn(Option<&str>, Option<&str>) -> String,
    options: [&'static str; 3],
    answer: &'static str,
}

fn teamwork_question(_topic: Option<&str>, company: Option<&str>) -> String {
    format!(
        "What is a behavioral question {} might ask regarding teamwork?",
        company.unwrap_or("a tech company")
    )
}

fn explain_question(topic: Option<&str>, company: Option<&str>) -> String {
    format!(
        "How would you explain {} to a non-technical interviewer at {}?",
        topic.unwrap_or("your main skill"),
        company.unwrap_or("the company")
    )
}

fn project_question(topic: Option<&str>, _company: Option<&str>) -> String {
    format!(
        "Describe a project where you used {}. What was the outcome?",
        topic.unwrap_or("a relevant technology")
    )
}

fn motivation_question(_topic: Option<&str>, company: Option<&str>) -> String {
    format!(
        "Why are you interested in working for {}?",
        company.unwrap_or("our company")
    )
}

fn growth_question(topic: Option<&str>, _company: Option<&str>) -> String {
    format!(
        "Where do you see yourself in 5 years, in relation to {}?",
        topic.unwrap_or("your field")
    )
}

static TEMPLATES: [Template; 5] = [
    Template {
        question: teamwork_question,
        options: [
            "Hint: Use the STAR method.",
            "Talk about a specific project.",
            "Focus on conflict resolution.",
        ],
        answer: "Provide a specific example of a time you successfully collaborated on a challenging project.",
    },
    Template {
        question: explain_question,
        options: [
            "Hint: Use analogies.",
            "Avoid jargon.",
            "Focus on business value.",
        ],
        answer: "Focus on simplifying the concept and highlighting its benefits.",
    },
    Template {
        question: project_question,
        options: [
            "Hint: Quantify the outcome if possible.",
            "Show self-reflection.",
            "What would you do differently?",
        ],
        answer: "Clearly describe the project, the positive result, and a point about future improvement.",
    },
    Template {
        question: motivation_question,
        options: [
            "Hint: Mention company values.",
            "Relate to their products.",
            "Show genuine enthusiasm.",
        ],
        answer: "Connect your personal career goals and values with the company's mission and recent achievements.",
    },
    Template {
        question: growth_question,
        options: [
            "Hint: Show ambition.",
            "Be realistic.",
            "Align with potential growth at the company.",
        ],
        answer: "Describe a path of growth that shows you are committed to the field and see a future with the company.",
    },
];

/// Offline generator. Cheap to clone; holds only its simulated latency.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    delay: Duration,
}

impl TemplateGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Waits out the simulated latency, then returns exactly
    /// `req.num_questions` questions.
    pub async fn generate(&self, req: &QuizRequest) -> QuizResult {
        tokio::time::sleep(self.delay).await;
        let questions = build_questions(req);
        info!(
            "Fallback generated {} questions (topic={:?}, company={:?})",
            questions.len(),
            req.topic(),
            req.company()
        );
        questions
    }
}

fn build_questions(req: &QuizRequest) -> QuizResult {
    (0..req.num_questions as usize)
        .map(|i| {
            let template = &TEMPLATES[i % TEMPLATES.len()];
            QuizQuestion {
                question: format!(
                    "{} (Question {})",
                    (template.question)(req.topic(), req.company()),
                    i + 1
                ),
                options: template.options.iter().map(|o| o.to_string()).collect(),
                answer: template.answer.to_string(),
            }
        })
        .collect()
}
