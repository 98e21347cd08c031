use std::sync::Arc;

use crate::config::{BackendKind, Config};
use crate::llm_client::GeminiClient;
use crate::quiz::fallback::TemplateGenerator;
use crate::quiz::orchestrator::GenerationBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Only immutable configuration lives here; each request builds its own orchestrator.
#[derive(Clone)]
pub struct AppState {
    pub backend: GenerationBackend,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let backend = match config.backend {
            BackendKind::Live => GenerationBackend::Live(Arc::new(GeminiClient::new(
                config.gemini_api_key.clone(),
                config.gemini_api_url.clone(),
            ))),
            BackendKind::Fallback => {
                GenerationBackend::Fallback(TemplateGenerator::new(config.fallback_delay))
            }
        };

        Self { backend }
    }
}
