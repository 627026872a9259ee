use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use mcp::server::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::evaluation::DEFAULT_PASS_THRESHOLD;
    use crate::domain::tools::ToolRegistry;

    use super::*;

    fn app() -> Router {
        let registry = ToolRegistry::standard(DEFAULT_PASS_THRESHOLD).expect("standard registry");
        build_app(AppState::new(Arc::new(Dispatcher::new(registry))))
    }

    async fn post_mcp(body: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (status, body.to_vec())
    }

    async fn post_mcp_json(body: &str) -> Value {
        let (status, body) = post_mcp(body).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).expect("valid json response")
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert_eq!(body, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn discovery_points_at_mcp_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/.well-known/mcp")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body_json: Value = serde_json::from_slice(&body).expect("valid json response");
        assert_eq!(body_json["mcp_endpoint"], "/mcp");
        assert_eq!(body_json["name"], env!("CARGO_PKG_NAME"));
    }

    #[tokio::test]
    async fn root_get_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mcp_unknown_method_returns_method_not_found() {
        let body_json =
            post_mcp_json(r#"{"jsonrpc":"2.0","id":1,"method":"unknown"}"#).await;

        assert_eq!(body_json["jsonrpc"], "2.0");
        assert_eq!(body_json["id"], 1);
        assert_eq!(body_json["error"]["code"], -32601);
        assert!(body_json.get("result").is_none());
    }

    #[tokio::test]
    async fn mcp_malformed_body_returns_parse_error_with_null_id() {
        let body_json = post_mcp_json("{\"jsonrpc\":\"2.0\",").await;

        assert_eq!(body_json["error"]["code"], -32700);
        assert!(body_json["id"].is_null());
    }

    #[tokio::test]
    async fn mcp_initialize_returns_result() {
        let body_json = post_mcp_json(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test-client","version":"1.0.0"},"capabilities":{}}}"#,
        )
        .await;

        assert_eq!(body_json["jsonrpc"], "2.0");
        assert_eq!(body_json["id"], 1);
        assert_eq!(body_json["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(
            body_json["result"]["serverInfo"]["name"],
            env!("CARGO_PKG_NAME")
        );
        assert!(body_json["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn mcp_tools_list_returns_all_tools() {
        let body_json =
            post_mcp_json(r#"{"jsonrpc":"2.0","id":"list","method":"tools/list"}"#).await;

        let names = body_json["result"]["tools"]
            .as_array()
            .expect("tools array")
            .iter()
            .map(|tool| tool["name"].as_str().expect("tool name").to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "analyze_student_gaps",
                "validate_question",
                "compare_to_benchmark"
            ]
        );
        assert_eq!(body_json["id"], "list");
    }

    #[tokio::test]
    async fn mcp_tools_call_returns_text_content() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {
                "name": "compare_to_benchmark",
                "arguments": {
                    "generated_question": {
                        "text": "Emma has 24 stickers. She shares them equally among 4 friends. How many stickers does each friend get?",
                        "answer": 6
                    },
                    "topic": "division"
                }
            }
        });
        let body_json = post_mcp_json(&request.to_string()).await;

        let text = body_json["result"]["content"][0]["text"]
            .as_str()
            .expect("text content");
        let report: Value = serde_json::from_str(text).expect("tool text is JSON");
        assert_eq!(report["passesBenchmark"], true);
        assert_eq!(body_json["result"]["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn mcp_tools_call_unknown_tool_is_invalid_params() {
        let body_json = post_mcp_json(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        )
        .await;

        assert_eq!(body_json["error"]["code"], -32602);
        assert_eq!(body_json["error"]["data"]["code"], "unknown_tool");
    }

    #[tokio::test]
    async fn mcp_notification_returns_no_content() {
        let (status, body) =
            post_mcp(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn mcp_batch_answers_requests_and_skips_notifications() {
        let body_json = post_mcp_json(
            r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},{"jsonrpc":"2.0","method":"notifications/initialized"},{"jsonrpc":"2.0","id":2,"method":"bogus"}]"#,
        )
        .await;

        let responses = body_json.as_array().expect("batch response");
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"], json!({}));
        assert_eq!(responses[1]["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn mcp_empty_batch_is_invalid_request() {
        let body_json = post_mcp_json("[]").await;

        assert_eq!(body_json[0]["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn root_post_does_not_provide_mcp() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
