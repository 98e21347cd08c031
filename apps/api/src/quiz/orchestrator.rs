//! Quiz Orchestrator: sequences one generation cycle as an explicit state machine.
//!
//! States: Idle → Validating → Generating → {Success, Error} → Idle
//!
//! Live path:     validate → prompts::build → CompletionService → normalize
//! Fallback path: validate → TemplateGenerator
//!
//! `submit` takes `&mut self`, so one instance never runs two cycles at once.
//! The only way to observe `Validating`/`Generating` from the outside is a
//! dropped `submit` future; such an instance rejects further work as `Busy`
//! until `reset` is called.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm_client::CompletionService;
use crate::quiz::fallback::TemplateGenerator;
use crate::quiz::models::{GenerationError, QuizRequest, QuizResult, RawQuizInput};
use crate::quiz::{normalizer, prompts, validator};

/// The generation path an orchestrator runs in `Generating`.
#[derive(Clone)]
pub enum GenerationBackend {
    Live(Arc<dyn CompletionService>),
    Fallback(TemplateGenerator),
}

impl GenerationBackend {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationBackend::Live(_) => "live",
            GenerationBackend::Fallback(_) => "fallback",
        }
    }
}

// Outcomes are read by hosts that keep one orchestrator across submissions;
// the HTTP host builds one per request and uses the `submit` return value.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Validating,
    Generating,
    Success(QuizResult),
    Error(GenerationError),
}

impl OrchestratorState {
    fn label(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::Validating => "validating",
            OrchestratorState::Generating => "generating",
            OrchestratorState::Success(_) => "success",
            OrchestratorState::Error(_) => "error",
        }
    }

    fn accepts_submission(&self) -> bool {
        !matches!(
            self,
            OrchestratorState::Validating | OrchestratorState::Generating
        )
    }
}

pub struct Orchestrator {
    backend: GenerationBackend,
    state: OrchestratorState,
}

impl Orchestrator {
    pub fn new(backend: GenerationBackend) -> Self {
        Self {
            backend,
            state: OrchestratorState::Idle,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Runs one full cycle. Any previous `Success`/`Error` outcome is discarded.
    /// The outcome is also kept in `state()` until `acknowledge` is called.
    pub async fn submit(&mut self, raw: RawQuizInput) -> Result<QuizResult, GenerationError> {
        if !self.state.accepts_submission() {
            warn!(
                "Rejected submission while {} (backend={})",
                self.state.label(),
                self.backend.name()
            );
            return Err(GenerationError::Busy);
        }

        let cycle_id = Uuid::new_v4();
        self.transition(cycle_id, OrchestratorState::Validating);

        let request = match validator::validate(&raw) {
            Ok(request) => request,
            Err(e) => {
                info!("Cycle {cycle_id}: rejected input: {e}");
                self.transition(cycle_id, OrchestratorState::Error(e.clone()));
                return Err(e);
            }
        };

        self.transition(cycle_id, OrchestratorState::Generating);
        info!(
            "Cycle {cycle_id}: generating {} questions via {} backend",
            request.num_questions,
            self.backend.name()
        );

        let outcome = match &self.backend {
            GenerationBackend::Live(service) => generate_live(service.as_ref(), &request).await,
            GenerationBackend::Fallback(generator) => Ok(generator.generate(&request).await),
        };

        match outcome {
            Ok(questions) => {
                check_shape(cycle_id, &request, &questions);
                self.transition(cycle_id, OrchestratorState::Success(questions.clone()));
                Ok(questions)
            }
            Err(e) => {
                warn!("Cycle {cycle_id}: generation failed: {e}");
                self.transition(cycle_id, OrchestratorState::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Caller has consumed the outcome; return to `Idle`.
    /// No effect while a cycle is still marked in flight.
    #[allow(dead_code)]
    pub fn acknowledge(&mut self) {
        if self.state.accepts_submission() {
            self.state = OrchestratorState::Idle;
        }
    }

    /// Forces the machine back to `Idle`, abandoning a cycle whose future was dropped.
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.state = OrchestratorState::Idle;
    }

    fn transition(&mut self, cycle_id: Uuid, next: OrchestratorState) {
        debug!(
            "Cycle {cycle_id}: {} -> {}",
            self.state.label(),
            next.label()
        );
        self.state = next;
    }
}

async fn generate_live(
    service: &dyn CompletionService,
    request: &QuizRequest,
) -> Result<QuizResult, GenerationError> {
    let instruction = prompts::build(request);
    let raw = service
        .complete(&instruction.text, &instruction.response_schema)
        .await?;
    normalizer::normalize(&raw)
}

/// Live output is returned as-is; shape drift is only logged.
fn check_shape(cycle_id: Uuid, request: &QuizRequest, questions: &QuizResult) {
    if questions.len() != request.num_questions as usize {
        warn!(
            "Cycle {cycle_id}: requested {} questions, got {}",
            request.num_questions,
            questions.len()
        );
    }
    let malformed = questions
        .iter()
        .filter(|q| q.options.len() != 3 || q.answer.trim().is_empty())
        .count();
    if malformed > 0 {
        warn!("Cycle {cycle_id}: {malformed} questions do not have 3 options and an answer");
    }
}
