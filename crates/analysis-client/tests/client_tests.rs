//! End-to-end client tests against a local mock of the analysis service

use analysis_client::{
    AnalysisClient, AnalysisSession, ClientConfig, ClientError, RaceState, StaticToken,
};
use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const TOKEN: &str = "test-token";

// ============================================================
// Mock service
// ============================================================

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Unauthorized" })),
    )
        .into_response()
}

/// Span over the first whitespace-delimited word, in UTF-16 code units
/// the way the service reports offsets
fn first_word(text: &str) -> (usize, usize) {
    let start = text.len() - text.trim_start().len();
    let end = text[start..]
        .find(char::is_whitespace)
        .map(|i| start + i)
        .unwrap_or(text.len());
    (
        text[..start].encode_utf16().count(),
        text[..end].encode_utf16().count(),
    )
}

fn echo_result(label: String, (start, end): (usize, usize)) -> Response {
    Json(json!({
        "summary": { "risk_count": 1, "highest_severity": "HIGH" },
        "spans": [
            { "label": label, "severity": "HIGH", "start": start, "end": end, "explanation": "echo" }
        ],
        "scan_id": "scan-1"
    }))
    .into_response()
}

/// `/v1/analyze`: JSON `{"text": ..}`, offsets into that text
async fn analyze(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let text = body["text"].as_str().unwrap_or("");
    echo_result(format!("json:{}", text), first_word(text))
}

/// `/v1/analyze-raw`: the whole body is the document, whatever it looks like
async fn analyze_raw(headers: HeaderMap, body: String) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    echo_result(format!("raw:{}", body), first_word(&body))
}

async fn analyze_file(headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let body = String::from_utf8_lossy(&body);
    let label = format!(
        "file:{}:{}",
        body.contains("name=\"file\""),
        body.contains("filename=\"terms.txt\"") && body.contains("Arbitration clause")
    );
    echo_result(label, (0, 4))
}

async fn analyze_summary(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "summary": { "risk_count": 7, "highest_severity": "MED" } })).into_response()
}

async fn slow_analyze(headers: HeaderMap, body: Json<Value>) -> Response {
    tokio::time::sleep(Duration::from_millis(150)).await;
    analyze(headers, body).await
}

fn service() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/v1/analyze", post(analyze))
        .route("/v1/analyze-raw", post(analyze_raw))
        .route("/v1/analyze-file", post(analyze_file))
        .route("/v1/analyze-summary", post(analyze_summary))
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> AnalysisClient {
    let config = ClientConfig::default()
        .with_api_base(base)
        .unwrap()
        .with_token(TOKEN);
    AnalysisClient::new(config)
}

fn first_label(result: &shared_types::ApiResult) -> &str {
    &result.spans[0].label
}

// ============================================================
// Endpoints
// ============================================================

#[tokio::test]
async fn test_health() {
    let base = spawn(service()).await;
    let health = client(&base).health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.body, "ok");
}

#[tokio::test]
async fn test_analyze_text_sends_json() {
    let base = spawn(service()).await;
    let result = client(&base).analyze_text("Fees apply.").await.unwrap();

    assert_eq!(first_label(&result), "json:Fees apply.");
    assert_eq!(result.summary.risk_count, 1);
    assert_eq!(result.scan_id.as_deref(), Some("scan-1"));
}

#[tokio::test]
async fn test_offsets_line_up_with_submitted_text() {
    let base = spawn(service()).await;
    let client = client(&base);
    let text = "Arbitration is mandatory for all disputes.";

    for result in [
        client.analyze_text(text).await.unwrap(),
        client.analyze_plain(text).await.unwrap(),
    ] {
        let span = &result.spans[0];
        assert_eq!((span.start, span.end), (0, 11));

        let report = span_engine::SpanEngine::new().highlight(text, &result);
        let highlighted: Vec<&str> = report
            .segments
            .iter()
            .filter(|s| s.is_highlighted())
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(highlighted, vec!["Arbitration"]);
    }
}

#[tokio::test]
async fn test_offsets_count_utf16_units() {
    let base = spawn(service()).await;
    let result = client(&base).analyze_text("Café fees apply.").await.unwrap();
    assert_eq!((result.spans[0].start, result.spans[0].end), (0, 4));

    let result = client(&base).analyze_text("👍🏽 fees apply.").await.unwrap();
    assert_eq!((result.spans[0].start, result.spans[0].end), (0, 4));
}

#[tokio::test]
async fn test_analyze_plain_sends_raw_body() {
    let base = spawn(service()).await;
    let result = client(&base).analyze_plain("Fees apply.").await.unwrap();
    assert_eq!(first_label(&result), "raw:Fees apply.");
}

#[tokio::test]
async fn test_long_text_is_truncated() {
    let base = spawn(service()).await;
    let config = ClientConfig {
        max_chars: 5,
        ..ClientConfig::default()
    }
    .with_api_base(&base)
    .unwrap()
    .with_token(TOKEN);

    let result = AnalysisClient::new(config)
        .analyze_text("héllo world")
        .await
        .unwrap();
    assert_eq!(first_label(&result), "json:héllo");
}

#[tokio::test]
async fn test_analyze_file_uploads_multipart() {
    let base = spawn(service()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("terms.txt");
    std::fs::write(&path, "Arbitration clause applies.").unwrap();

    let result = client(&base).analyze_file(&path).await.unwrap();
    assert_eq!(first_label(&result), "file:true:true");
}

#[tokio::test]
async fn test_analyze_summary_unwraps() {
    let base = spawn(service()).await;
    let summary = client(&base).analyze_summary("Fees apply.").await.unwrap();
    assert_eq!(summary.risk_count, 7);
    assert_eq!(summary.highest_severity.as_deref(), Some("MED"));
}

// ============================================================
// Failures
// ============================================================

#[tokio::test]
async fn test_wrong_token_reports_json_body() {
    let base = spawn(service()).await;
    let client = client(&base).with_token_provider(Arc::new(StaticToken::new("nope")));

    let err = client.analyze_text("Fees apply.").await.unwrap_err();
    match &err {
        ClientError::Http { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, r#"401 Unauthorized: {"detail":"Unauthorized"}"#);
        }
        other => panic!("expected Http error, got {:?}", other),
    }
    assert!(err.user_message().contains("sign in"));
}

#[tokio::test]
async fn test_plain_text_failure_body() {
    let app = Router::new().route(
        "/v1/analyze",
        post(|| async { (StatusCode::BAD_GATEWAY, "Model call failed") }),
    );
    let base = spawn(app).await;

    let err = client(&base).analyze_text("Fees apply.").await.unwrap_err();
    assert_eq!(err.to_string(), "502 Bad Gateway: Model call failed");
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let app = Router::new().route("/v1/analyze", post(|| async { "not json" }));
    let base = spawn(app).await;

    let err = client(&base).analyze_text("Fees apply.").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_empty_input_never_hits_network() {
    // nothing listens here; reaching the network would be a Transport error
    let client = client("http://127.0.0.1:9");
    assert!(matches!(
        client.analyze_text("   ").await,
        Err(ClientError::EmptyInput)
    ));
    assert!(matches!(
        client.analyze_with_preview("", |_| {}).await,
        Err(ClientError::EmptyInput)
    ));
}

// ============================================================
// Preview race and session
// ============================================================

#[tokio::test]
async fn test_preview_arrives_before_full() {
    let app = Router::new()
        .route("/v1/analyze", post(slow_analyze))
        .route("/v1/analyze-summary", post(analyze_summary));
    let base = spawn(app).await;

    let mut seen = Vec::new();
    let result = client(&base)
        .analyze_with_preview("Fees apply.", |state| seen.push(state.clone()))
        .await
        .unwrap();

    assert_eq!(seen.len(), 2);
    assert!(matches!(&seen[0], RaceState::PreviewArrived(s) if s.risk_count == 7));
    assert_eq!(seen[1], RaceState::FullArrived(result));
}

#[tokio::test]
async fn test_session_with_live_client() {
    let base = spawn(service()).await;
    let client = client(&base);
    let mut session = AnalysisSession::new();
    session.set_text("Fees apply monthly.");

    let stale = session.begin().unwrap();
    let ticket = session.begin().unwrap();
    let (old, new) = tokio::join!(
        client.analyze_text(session.text()),
        client.analyze_text(session.text())
    );

    assert!(session.complete(ticket, new));
    assert!(!session.complete(stale, old));

    let report = session.highlight().unwrap();
    assert_eq!(report.segments[0].text, "Fees");
    assert_eq!(report.rows.len(), 1);
}
