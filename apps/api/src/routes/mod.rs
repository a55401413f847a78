pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::chat::handlers as chat_handlers;
use crate::documents::handlers as document_handlers;
use crate::matching::handlers as matching_handlers;
use crate::plans::handlers as plan_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/chat", post(chat_handlers::handle_chat))
        .route(
            "/api/v1/chat/stream",
            post(chat_handlers::handle_chat_stream),
        )
        .route("/api/v1/analyze", post(analysis_handlers::handle_analyze))
        .route("/api/v1/match", post(matching_handlers::handle_match))
        .route("/api/v1/study-plan", post(plan_handlers::handle_study_plan))
        .route(
            "/api/v1/documents/upload",
            post(document_handlers::handle_upload),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{GeminiClient, RetryPolicy};
    use crate::matching::scoring::GeminiMatchScorer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(base_url: &str) -> AppState {
        let gemini = GeminiClient::new(Some("test-key".to_string()))
            .with_base_url(base_url)
            .with_policy(RetryPolicy {
                max_retries: 5,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(4),
                max_jitter: Duration::from_millis(1),
            })
            .with_jitter(Arc::new(|_| Duration::ZERO));
        let matcher = Arc::new(GeminiMatchScorer::new(gemini.clone()));
        AppState { gemini, matcher }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).to_string()
    }

    fn generation_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = build_router(test_state("http://127.0.0.1:1"));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#""status":"ok""#));
        assert!(body.contains("learnix-api"));
    }

    #[tokio::test]
    async fn test_chat_returns_both_envelopes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(generation_body("Hi! How can I help?"))
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json("/api/v1/chat", r#"{"message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["message"]["sender"], "user");
        assert_eq!(body["message"]["text"], "hello");
        assert_eq!(body["reply"]["sender"], "assistant");
        assert_eq!(body["reply"]["text"], "Hi! How can I help?");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = build_router(test_state("http://127.0.0.1:1"));
        let response = app
            .oneshot(post_json("/api/v1/chat", r#"{"message":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_chat_surfaces_backend_message_on_terminal_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(
                r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
            )
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json("/api/v1/chat", r#"{"message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_string(response).await;
        assert!(body.contains("INVALID_ARGUMENT"));
        assert!(body.contains("API key not valid."));
    }

    #[tokio::test]
    async fn test_chat_stream_forwards_fragments_then_done() {
        let sse = concat!(
            r#"data: {"candidates":[{"content":{"parts":[{"text":"Once "}]}}]}"#,
            "\r\n\r\n",
            r#"data: {"candidates":[{"content":{"parts":[{"text":"upon a time"}]}}]}"#,
            "\r\n\r\n",
        );
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:streamGenerateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse)
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json("/api/v1/chat/stream", r#"{"message":"story"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        let once = body.find("data: Once").expect("first fragment");
        let upon = body.find("data: upon a time").expect("second fragment");
        let done = body.find("event: done").expect("done event");
        assert!(once < upon && upon < done);
    }

    #[tokio::test]
    async fn test_chat_stream_reports_error_event_on_terminal_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:streamGenerateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(
                r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
            )
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json("/api/v1/chat/stream", r#"{"message":"story"}"#))
            .await
            .unwrap();

        // The SSE channel opens fine; the failure arrives as an event.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("event: error"));
        assert!(body.contains("INVALID_ARGUMENT"));
    }

    #[tokio::test]
    async fn test_match_endpoint_degrades_to_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(generation_body("no json, just vibes"))
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json(
                "/api/v1/match",
                r#"{"student_profile":"x","tutor_profile":"y"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["score"], 0);
        assert_eq!(body["reasoning"], "Error analyzing compatibility");
    }

    #[tokio::test]
    async fn test_study_plan_returns_raw_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(generation_body("Day 1: limits. Day 2: derivatives."))
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(post_json(
                "/api/v1/study-plan",
                r#"{"topic":"Calculus","level":"beginner","duration":"2 weeks"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["plan"], "Day 1: limits. Day 2: derivatives.");
    }
}
