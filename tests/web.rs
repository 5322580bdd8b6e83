// Router tests driven through tower::ServiceExt::oneshot — no socket bound.
//
// Validation failures must be rejected at the boundary (client error,
// service untouched); classifier failures map to 500 after the request has
// been counted.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use palisade::classifier::TextClassifier;
use palisade::service::ModerationService;
use palisade::web::{build_router, AppState};

struct StubClassifier;

#[async_trait]
impl TextClassifier for StubClassifier {
    async fn classify(&self, text: &str) -> Result<HashMap<String, f32>> {
        let violent = text.contains("hate") || text.contains("hurt");
        Ok(HashMap::from([
            ("V".to_string(), if violent { 0.92 } else { 0.02 }),
            ("OK".to_string(), if violent { 0.05 } else { 0.97 }),
        ]))
    }
}

struct FailingClassifier;

#[async_trait]
impl TextClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<HashMap<String, f32>> {
        anyhow::bail!("inference backend unavailable")
    }
}

fn test_router(classifier: Arc<dyn TextClassifier>) -> axum::Router {
    build_router(AppState {
        service: Arc::new(ModerationService::new(classifier)),
    })
}

fn moderate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/content-moderation/moderate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn moderate_endpoint_success() {
    let app = test_router(Arc::new(StubClassifier));

    let response = app
        .oneshot(moderate_request(r#"{"text": "Hello, how are you today?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let safe = body["scores"]["Safe Content"].as_f64().unwrap();
    assert!(safe > 0.5, "got {safe}");
}

#[tokio::test]
async fn moderate_endpoint_harmful_content() {
    let app = test_router(Arc::new(StubClassifier));

    let response = app
        .oneshot(moderate_request(
            r#"{"text": "I hate you and want to hurt you"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let violence = body["scores"]["Violence"].as_f64().unwrap();
    assert!(violence > 0.5, "got {violence}");
}

#[tokio::test]
async fn moderate_endpoint_rejects_missing_text() {
    let app = test_router(Arc::new(StubClassifier));

    let response = app.oneshot(moderate_request("{}")).await.unwrap();

    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}

#[tokio::test]
async fn moderate_endpoint_rejects_wrong_typed_text() {
    let app = test_router(Arc::new(StubClassifier));

    let response = app
        .oneshot(moderate_request(r#"{"text": 123}"#))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}

#[tokio::test]
async fn classifier_failure_surfaces_as_server_error() {
    let app = test_router(Arc::new(FailingClassifier));

    let response = app
        .oneshot(moderate_request(r#"{"text": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn status_endpoint_reports_request_rate() {
    let state = AppState {
        service: Arc::new(ModerationService::new(Arc::new(StubClassifier))),
    };
    let app = build_router(state.clone());

    // Fresh service: no requests yet.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/content-moderation/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["requests_per_second"].as_f64().unwrap(), 0.0);

    // One moderation call later the rate is positive.
    app.clone()
        .oneshot(moderate_request(r#"{"text": "ping"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/content-moderation/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["requests_per_second"].as_f64().unwrap() > 0.0);
}
