// Quiz generation pipeline
// Implements: input validation, prompt building, response normalization,
// template fallback, and the orchestrator that sequences them.
// All completion calls go through llm_client; no direct Gemini calls here.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod validator;
