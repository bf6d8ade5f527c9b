use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::connect_info::MockConnectInfo,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use exam_relay::build_router;
use exam_relay::error::ProviderError;
use exam_relay::provider::CompletionProvider;
use exam_relay::rate_limit::{RateLimiter, RateWindow};
use exam_relay::state::AppState;

const EXAM_JSON: &str = r#"{"exam_set": [{"passage": "p", "question": "q", "options": ["a", "b", "c", "d"], "correct": 2}]}"#;

enum Reply {
    Exam,
    Fail,
    NoKey,
}

struct FakeProvider {
    calls: AtomicUsize,
    reply: Reply,
}

impl FakeProvider {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Exam => Ok(EXAM_JSON.to_string()),
            Reply::Fail => Err(ProviderError::Api {
                status: 401,
                message: "invalid key".to_string(),
            }),
            Reply::NoKey => Err(ProviderError::MissingApiKey),
        }
    }
}

fn app(provider: Arc<FakeProvider>) -> Router {
    app_with_windows(provider, vec![RateWindow::minute(2), RateWindow::day(50)])
}

fn app_with_windows(provider: Arc<FakeProvider>, windows: Vec<RateWindow>) -> Router {
    let state = Arc::new(AppState::new(provider, Arc::new(RateLimiter::new(windows))));
    build_router(state).layer(MockConnectInfo(SocketAddr::from(([198, 51, 100, 9], 40000))))
}

async fn post(app: &Router, body: Body) -> Response {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/generate-exam")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn post_token(app: &Router, token: &str) -> Response {
    post(app, Body::from(format!(r#"{{"token": "{}"}}"#, token))).await
}

async fn body_text(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(res: Response) -> Value {
    serde_json::from_str(&body_text(res).await).unwrap()
}

#[tokio::test]
async fn first_two_requests_reach_the_provider() {
    let provider = FakeProvider::new(Reply::Exam);
    let app = app(provider.clone());

    for _ in 0..2 {
        let res = post_token(&app, "X").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_text(res).await, EXAM_JSON);
    }
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn third_request_in_a_minute_is_rate_limited() {
    let provider = FakeProvider::new(Reply::Exam);
    let app = app(provider.clone());

    post_token(&app, "X").await;
    post_token(&app, "X").await;
    let res = post_token(&app, "X").await;

    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key(header::RETRY_AFTER));
    let body = body_json(res).await;
    assert_eq!(body["error"], "Rate limit exceeded");
    assert_eq!(body["detail"], "2 per 1 minute");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn provider_failure_becomes_500_with_message() {
    let provider = FakeProvider::new(Reply::Fail);
    let app = app(provider.clone());

    let res = post_token(&app, "X").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await, serde_json::json!({ "error": "invalid key" }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn missing_api_key_becomes_single_500() {
    let provider = FakeProvider::new(Reply::NoKey);
    let app = app(provider.clone());

    let res = post(&app, Body::empty()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body, serde_json::json!({ "error": "OPENAI_API_KEY is not set" }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn oversized_body_is_counted_in_the_address_bucket() {
    let provider = FakeProvider::new(Reply::Exam);
    let app = app(provider.clone());

    // well past axum's default 2 MiB body limit
    let big = vec![b'a'; 3 * 1024 * 1024];
    let res = post(&app, Body::from(big)).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(post(&app, Body::empty()).await.status(), StatusCode::OK);
    assert_eq!(post(&app, Body::empty()).await.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn daily_window_denies_independently() {
    let provider = FakeProvider::new(Reply::Exam);
    // minute window wide open so only the day can refuse
    let app = app_with_windows(provider.clone(), vec![RateWindow::minute(1000), RateWindow::day(50)]);

    for _ in 0..50 {
        assert_eq!(post_token(&app, "u42").await.status(), StatusCode::OK);
    }
    let res = post_token(&app, "u42").await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(res).await["detail"], "50 per 1 day");
    assert_eq!(provider.calls(), 50);
}

#[tokio::test]
async fn bodiless_requests_share_the_address_bucket() {
    let provider = FakeProvider::new(Reply::Exam);
    let app = app(provider.clone());

    assert_eq!(post(&app, Body::empty()).await.status(), StatusCode::OK);
    assert_eq!(post(&app, Body::from("{broken")).await.status(), StatusCode::OK);
    assert_eq!(post(&app, Body::empty()).await.status(), StatusCode::TOO_MANY_REQUESTS);

    // a token gets its own bucket even from the same address
    assert_eq!(post_token(&app, "someone").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_is_not_allowed() {
    let app = app(FakeProvider::new(Reply::Exam));
    let req = Request::builder()
        .method(Method::GET)
        .uri("/generate-exam")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn any_origin_is_allowed() {
    let app = app(FakeProvider::new(Reply::Exam));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/generate-exam")
        .header(header::ORIGIN, "https://quiz.example.org")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app(FakeProvider::new(Reply::Exam));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "healthy");
}

#[tokio::test]
async fn metrics_expose_request_counters() {
    let app = app(FakeProvider::new(Reply::Exam));
    post_token(&app, "metrics").await;

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("exam_relay_requests_total"));
}
