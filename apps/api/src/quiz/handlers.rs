//! Axum route handlers for the Quiz API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::quiz::models::{QuizResult, RawQuizInput};
use crate::quiz::orchestrator::Orchestrator;
use crate::state::AppState;

/// POST /generate
///
/// Runs one generation cycle on a fresh orchestrator and returns the questions
/// as a bare JSON array.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<RawQuizInput>, JsonRejection>,
) -> Result<Json<QuizResult>, AppError> {
    let Json(raw) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let mut orchestrator = Orchestrator::new(state.backend.clone());
    let questions = orchestrator.submit(raw).await?;

    Ok(Json(questions))
}

/// Any method other than POST on /generate.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
