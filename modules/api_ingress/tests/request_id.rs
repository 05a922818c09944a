use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use modkit::{Problem, ProblemResponse, RequestCtx};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::ApiIngress;

#[tokio::test]
async fn generates_request_id_when_missing() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert!(request_id.is_some(), "x-request-id should be generated");
    let request_id = request_id.unwrap();
    assert!(!request_id.is_empty(), "request_id should not be empty");

    // Handlers see the same id the client gets back
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["request_id"], request_id);
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("abc-123"));
}

#[tokio::test]
async fn includes_request_id_in_problem_json() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/error")
                .header("x-request-id", "error-test-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("error-test-123"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["detail"], "Test error");
    assert_eq!(json["status"], 500);
    assert_eq!(json["instance"], "/error");
    assert_eq!(json["request_id"], "error-test-123");
}

fn test_app() -> Router {
    let routes = Router::new()
        .route("/test", get(success_handler))
        .route("/error", get(error_handler));

    ApiIngress::default().build_router(routes).unwrap()
}

async fn success_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "request_id": request_id}))
}

async fn error_handler(ctx: RequestCtx) -> ProblemResponse {
    ctx.decorate(
        Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Test error",
        )
        .with_code("TEST_ERROR"),
    )
    .into()
}
