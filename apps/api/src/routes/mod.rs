pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::quiz::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Quiz API
        .route(
            "/generate",
            post(handlers::handle_generate).fallback(handlers::handle_method_not_allowed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::errors::GENERATION_FAILED_MESSAGE;
    use crate::llm_client::{CompletionService, LlmError, RawCompletion};
    use crate::quiz::fallback::TemplateGenerator;
    use crate::quiz::orchestrator::GenerationBackend;

    struct RejectingService;

    #[async_trait]
    impl CompletionService for RejectingService {
        async fn complete(&self, _: &str, _: &Value) -> Result<RawCompletion, LlmError> {
            Err(LlmError::Api {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".to_string(),
            })
        }
    }

    struct GarbledService;

    #[async_trait]
    impl CompletionService for GarbledService {
        async fn complete(&self, _: &str, _: &Value) -> Result<RawCompletion, LlmError> {
            Ok(RawCompletion {
                body: json!({"candidates": [{"content": {"parts": [{"text": "not json"}]}}]})
                    .to_string(),
            })
        }
    }

    fn fallback_router() -> Router {
        build_router(AppState {
            backend: GenerationBackend::Fallback(TemplateGenerator::new(Duration::ZERO)),
        })
    }

    fn live_router(service: Arc<dyn CompletionService>) -> Router {
        build_router(AppState {
            backend: GenerationBackend::Live(service),
        })
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_question_array() {
        let response = fallback_router()
            .oneshot(generate_request(
                json!({"topic": "React Hooks", "company": "", "numQuestions": 10}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let questions = body.as_array().unwrap();
        assert_eq!(questions.len(), 10);
        assert_eq!(questions[0]["options"].as_array().unwrap().len(), 3);
        assert!(questions[0]["answer"].is_string());
    }

    #[tokio::test]
    async fn test_generate_treats_null_topic_as_absent() {
        let response = fallback_router()
            .oneshot(generate_request(
                json!({"topic": null, "company": "Acme", "numQuestions": 10}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert!(body[1]["question"].as_str().unwrap().contains("your main skill"));
    }

    #[tokio::test]
    async fn test_generate_rejects_other_methods() {
        let response = fallback_router()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(read_json(response).await["message"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_generate_validation_error_is_bad_request() {
        let response = fallback_router()
            .oneshot(generate_request(
                json!({"topic": "Rust", "company": "", "numQuestions": 21}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "count out of range");
    }

    #[tokio::test]
    async fn test_generate_malformed_body_is_bad_request() {
        let response = fallback_router()
            .oneshot(generate_request(json!({"topic": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_transport_error_is_generic_500() {
        let response = live_router(Arc::new(RejectingService))
            .oneshot(generate_request(
                json!({"topic": "Rust", "company": "Acme", "numQuestions": 10}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["message"], GENERATION_FAILED_MESSAGE);
        assert!(!body.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn test_generate_parse_error_is_generic_500() {
        let response = live_router(Arc::new(GarbledService))
            .oneshot(generate_request(
                json!({"topic": "Rust", "company": "", "numQuestions": 10}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await["message"], GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let response = fallback_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "fallback");
    }
}
