use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::Service;

use exception_dispatch::errors::EXCEPTION_HANDLER_HEADER;

// Helper to create test app
fn create_test_app() -> axum::Router {
    use exception_dispatch::{advice, api};
    use std::sync::Arc;

    let registry = advice::default_registry().expect("Failed to build handler registry");

    let state = Arc::new(api::handlers::AppStateInner {
        registry: Arc::new(registry),
        instance_id: "test-instance".to_string(),
    });

    api::routes::create_router(state)
}

struct TestResponse {
    status: StatusCode,
    handler: Option<String>,
    content_type: String,
    text: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(json!({}))
    }
}

// Helper to send a GET request and capture the response
async fn send_request(app: &mut axum::Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let handler = response
        .headers()
        .get(EXCEPTION_HANDLER_HEADER)
        .map(|v| v.to_str().unwrap().to_string());
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        handler,
        content_type,
        text: String::from_utf8(body.to_vec()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/health").await;
    let body = response.json();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "exception-dispatch");
    assert_eq!(body["instance_id"], "test-instance");
    assert_eq!(body["exception_handlers"], 5);
}

// ========== SUCCESS PATHS ==========

#[tokio::test]
async fn test_all_endpoints_succeed_when_flag_is_false() {
    let mut app = create_test_app();

    for (path, message) in [
        ("/testExceptionHandler", "Ok"),
        ("/testResponseStatusExceptionResolver", "Ok"),
        ("/testCustomExceptionResolver", "Ok"),
        ("/testDefaultControllerAdvice", "All Ok"),
        ("/testCustomAdvice", "All Ok"),
        ("/testResponseStatusException", "All Ok!!!"),
    ] {
        let response = send_request(&mut app, &format!("{}?exception=false", path)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", path);
        assert_eq!(response.json(), json!({ "message": message }), "{}", path);
        assert!(response.handler.is_none(), "{}", path);
    }
}

#[tokio::test]
async fn test_flag_defaults_to_false() {
    let mut app = create_test_app();

    for path in [
        "/testExceptionHandler",
        "/testCustomExceptionResolver",
        "/testDefaultControllerAdvice",
        "/testCustomAdvice",
        "/testResponseStatusException",
    ] {
        let response = send_request(&mut app, path).await;
        assert_eq!(response.status, StatusCode::OK, "{}", path);
    }
}

// ========== FAILURE PATHS ==========

#[tokio::test]
async fn test_exception_handler_uses_route_local_handler() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testExceptionHandler?exception=true").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({ "message": "BusinessException in testExceptionExceptionHandler" })
    );
    assert_eq!(
        response.handler.as_deref(),
        Some("testExceptionHandler-local")
    );
}

#[tokio::test]
async fn test_response_status_resolver_fails_by_default() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testResponseStatusExceptionResolver").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json()["message"],
        "ServiceException in method testResponseStatusExceptionResolver"
    );
    assert_eq!(
        response.handler.as_deref(),
        Some("response-status-resolver")
    );
}

#[tokio::test]
async fn test_custom_exception_resolver() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testCustomExceptionResolver?exception=true").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({ "message": "CustomException was handled" })
    );
    assert_eq!(
        response.handler.as_deref(),
        Some("custom-exception-resolver")
    );
}

#[tokio::test]
async fn test_default_controller_advice() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testDefaultControllerAdvice?exception=true").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({ "message": "BusinessException in testDefaultControllerAdvice" })
    );
    assert_eq!(response.handler.as_deref(), Some("default-advice"));
}

#[tokio::test]
async fn test_custom_advice_beats_default_advice() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testCustomAdvice?exception=true").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["message"],
        "BusinessException in testCustomControllerAdvice"
    );
    assert_eq!(response.handler.as_deref(), Some("custom-advice"));
}

#[tokio::test]
async fn test_response_status_exception_is_teapot() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testResponseStatusException?exception=true").await;

    assert_eq!(response.status, StatusCode::IM_A_TEAPOT);
    assert!(response.content_type.starts_with("text/plain"));
    assert_eq!(
        response.text,
        "ResponseStatusException in testResponseStatusException"
    );
    assert_eq!(response.handler.as_deref(), Some("builtin-default"));
}

// ========== PROPERTIES ==========

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let mut app = create_test_app();

    for uri in [
        "/testCustomAdvice?exception=true",
        "/testExceptionHandler?exception=true",
        "/testResponseStatusException?exception=true",
    ] {
        let first = send_request(&mut app, uri).await;
        let second = send_request(&mut app, uri).await;

        assert_eq!(first.status, second.status, "{}", uri);
        assert_eq!(first.text, second.text, "{}", uri);
        assert_eq!(first.handler, second.handler, "{}", uri);
    }
}

#[tokio::test]
async fn test_invalid_flag_is_rejected() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testDefaultControllerAdvice?exception=maybe").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_flag_is_rejected_by_the_extractor() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/testDefaultControllerAdvice?exception=").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.handler.is_none());
}

#[tokio::test]
async fn test_openapi_document_lists_examples() {
    let mut app = create_test_app();
    let response = send_request(&mut app, "/api-docs/openapi.json").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["paths"]["/testResponseStatusException"].is_object());
    assert!(body["paths"]["/testCustomAdvice"].is_object());
}

#[tokio::test]
async fn test_metrics_count_resolved_exceptions() {
    exception_dispatch::metrics::registry::init_metrics();
    let mut app = create_test_app();
    send_request(&mut app, "/testDefaultControllerAdvice?exception=true").await;

    let response = send_request(&mut app, "/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("exceptions_resolved_total"));
    assert!(response.text.contains("default-advice"));
}
