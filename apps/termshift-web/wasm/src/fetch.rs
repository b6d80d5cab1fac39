//! Browser `fetch` against the analysis service

use shared_types::{
    bearer, failure_message, truncate_chars, user_message_for_status, ApiResult, Endpoint,
    MAX_TEXT_CHARS, MAX_UPLOAD_BYTES,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// `{"text": ..}` body for the JSON endpoints (`/v1/analyze`,
/// `/v1/analyze-summary`); `None` when there is nothing to analyze
pub fn text_body(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let text = truncate_chars(text, MAX_TEXT_CHARS);
    Some(serde_json::json!({ "text": text }).to_string())
}

/// Re-serialize a successful response so JS always sees the full shape
pub fn normalize_result(body: &str) -> Result<String, String> {
    let result: ApiResult =
        serde_json::from_str(body).map_err(|e| format!("Unexpected response: {}", e))?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// Console diagnostic and user-facing rejection for a non-2xx response
pub fn failure_report(
    status: u16,
    status_text: &str,
    content_type: Option<&str>,
    body: &str,
) -> (String, &'static str) {
    (
        failure_message(status, status_text, content_type, body),
        user_message_for_status(status),
    )
}

async fn send(
    endpoint: Endpoint,
    api_base: &str,
    token: &str,
    body: Option<&JsValue>,
    content_type: Option<&str>,
) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method(match endpoint {
        Endpoint::Health => "GET",
        _ => "POST",
    });
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(body);
    }

    let request = Request::new_with_str_and_init(&endpoint.url(api_base), &opts)?;
    if let Some(content_type) = content_type {
        request.headers().set("Content-Type", content_type)?;
    }
    if endpoint.requires_auth() {
        if token.trim().is_empty() {
            return Err(JsValue::from_str("Not signed in"));
        }
        request.headers().set("Authorization", &bearer(token))?;
    }

    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        let content_type = response.headers().get("content-type")?;
        let (log, shown) = failure_report(
            response.status(),
            &response.status_text(),
            content_type.as_deref(),
            &text,
        );
        web_sys::console::error_1(&JsValue::from_str(&log));
        return Err(JsValue::from_str(shown));
    }

    Ok(text)
}

async fn send_text(
    endpoint: Endpoint,
    api_base: &str,
    token: &str,
    text: &str,
) -> Result<String, JsValue> {
    let body = text_body(text).ok_or("Nothing to analyze")?;
    send(
        endpoint,
        api_base,
        token,
        Some(&JsValue::from_str(&body)),
        Some("application/json"),
    )
    .await
}

/// Analyze pasted text through the JSON endpoint; resolves to the result JSON
#[wasm_bindgen(js_name = analyzeText)]
pub async fn analyze_text(api_base: String, token: String, text: String) -> Result<String, JsValue> {
    let body = send_text(Endpoint::Analyze, &api_base, &token, &text).await?;
    normalize_result(&body).map_err(|e| JsValue::from_str(&e))
}

/// Analyze text sent as a raw `text/plain` body (extension style)
#[wasm_bindgen(js_name = analyzePlain)]
pub async fn analyze_plain(api_base: String, token: String, text: String) -> Result<String, JsValue> {
    if text.trim().is_empty() {
        return Err(JsValue::from_str("Nothing to analyze"));
    }
    let text = truncate_chars(&text, MAX_TEXT_CHARS);
    let body = send(
        Endpoint::AnalyzeRaw,
        &api_base,
        &token,
        Some(&JsValue::from_str(text)),
        Some("text/plain; charset=utf-8"),
    )
    .await?;
    normalize_result(&body).map_err(|e| JsValue::from_str(&e))
}

/// Upload a chosen file as multipart field `file`
#[wasm_bindgen(js_name = analyzeFile)]
pub async fn analyze_file(api_base: String, token: String, file: File) -> Result<String, JsValue> {
    if file.size() <= 0.0 {
        return Err(JsValue::from_str("Nothing to analyze"));
    }
    if file.size() > MAX_UPLOAD_BYTES as f64 {
        return Err(JsValue::from_str("File too large"));
    }

    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", &file, &file.name())?;
    let body = send(Endpoint::AnalyzeFile, &api_base, &token, Some(&form.into()), None).await?;
    normalize_result(&body).map_err(|e| JsValue::from_str(&e))
}

/// Summary-only preview; resolves to the raw summary JSON
#[wasm_bindgen(js_name = analyzeSummary)]
pub async fn analyze_summary(api_base: String, token: String, text: String) -> Result<String, JsValue> {
    send_text(Endpoint::AnalyzeSummary, &api_base, &token, &text).await
}

/// Liveness check; logs and returns the status code
#[wasm_bindgen(js_name = pingHealth)]
pub async fn ping_health(api_base: String) -> Result<u16, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let response = JsFuture::from(window.fetch_with_str(&Endpoint::Health.url(&api_base))).await?;
    let response: Response = response.dyn_into()?;
    let body = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();
    web_sys::console::log_1(&JsValue::from_str(&format!(
        "Ping {} {}",
        response.status(),
        body
    )));
    Ok(response.status())
}
