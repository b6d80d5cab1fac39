//! WASM bindings for the web app and the browser extension
//!
//! JSON crosses the boundary as strings (results, spans) or plain JS values
//! (in-page plans, policy links). Every failure reaches JS as a string.

use shared_types::{ApiResult, Span, Summary};
use span_engine::{
    auto_normalize, build_segments, collect_policy_links, plan_text_node,
    style::mark_stylesheet, whole_selection_severity, Range, RawLink, SpanEngine,
};
use wasm_bindgen::prelude::*;

// Export modules
pub mod fetch;
pub mod flags_panel;
pub mod preferences;
pub mod preview;

pub use flags_panel::{FlagItem, FlagsPanel};
pub use preferences::{DarkMode, Preferences};
pub use preview::PreviewRace;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_result(result_json: &str) -> Result<ApiResult, String> {
    serde_json::from_str(result_json).map_err(|e| format!("Invalid result JSON: {}", e))
}

fn parse_spans(spans_json: &str) -> Result<Vec<Span>, String> {
    serde_json::from_str(spans_json).map_err(|e| format!("Invalid spans JSON: {}", e))
}

fn highlight_json(text: &str, result_json: &str) -> Result<String, String> {
    let result = parse_result(result_json)?;
    let report = SpanEngine::new().highlight(text, &result);
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

fn segments_json(text: &str, spans_json: &str) -> Result<String, String> {
    let spans = parse_spans(spans_json)?;
    serde_json::to_string(&build_segments(text, &spans)).map_err(|e| e.to_string())
}

fn normalize_json(text: &str, spans_json: &str) -> Result<String, String> {
    let spans = parse_spans(spans_json)?;
    serde_json::to_string(&auto_normalize(text, &spans)).map_err(|e| e.to_string())
}

fn selection_severity(summary_json: Option<String>) -> String {
    let summary: Option<Summary> = summary_json
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok());
    whole_selection_severity(summary.as_ref()).css_name().to_string()
}

/// Full document view for a result: unit, segments, sidebar rows, summary
#[wasm_bindgen]
pub fn highlight(text: &str, result_json: &str) -> Result<String, JsValue> {
    highlight_json(text, result_json).map_err(|e| JsValue::from_str(&e))
}

/// Segments for character-offset spans
#[wasm_bindgen(js_name = buildSegments)]
pub fn build_segments_wasm(text: &str, spans_json: &str) -> Result<String, JsValue> {
    segments_json(text, spans_json).map_err(|e| JsValue::from_str(&e))
}

/// `{spans, unit}` with word-indexed spans converted to characters
#[wasm_bindgen(js_name = autoNormalizeSpans)]
pub fn auto_normalize_wasm(text: &str, spans_json: &str) -> Result<String, JsValue> {
    normalize_json(text, spans_json).map_err(|e| JsValue::from_str(&e))
}

/// Pieces to replace a text node with, or `null` to leave it alone
#[wasm_bindgen(js_name = planTextNode)]
pub fn plan_text_node_wasm(
    node_text: &str,
    node_start: u32,
    selection_start: u32,
    selection_end: u32,
    spans_json: &str,
) -> Result<JsValue, JsValue> {
    let spans = parse_spans(spans_json).map_err(|e| JsValue::from_str(&e))?;
    let selection = Range::new(selection_start as usize, selection_end as usize);

    match plan_text_node(node_text, node_start as usize, selection, &spans) {
        Some(pieces) => serde_wasm_bindgen::to_value(&pieces)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e))),
        None => Ok(JsValue::NULL),
    }
}

/// `data-sev` value for wrapping a whole selection when a result has no spans
#[wasm_bindgen(js_name = wholeSelectionSeverity)]
pub fn whole_selection_severity_wasm(summary_json: Option<String>) -> String {
    selection_severity(summary_json)
}

/// Policy links worth offering on a page, best first
#[wasm_bindgen(js_name = collectPolicyLinks)]
pub fn collect_policy_links_wasm(links: JsValue, page_url: &str) -> Result<JsValue, JsValue> {
    let links: Vec<RawLink> = serde_wasm_bindgen::from_value(links)
        .map_err(|e| JsValue::from_str(&format!("Invalid links: {}", e)))?;
    let candidates = collect_policy_links(&links, page_url);
    serde_wasm_bindgen::to_value(&candidates)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// CSS for in-page `<mark class=.. data-sev=..>` highlights
#[wasm_bindgen(js_name = markStylesheet)]
pub fn mark_stylesheet_wasm(class_name: &str) -> String {
    mark_stylesheet(class_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESULT: &str = r#"{
        "summary": {"risk_count": 1, "highest_severity": "HIGH"},
        "spans": [{"label": "Fees", "severity": "HIGH", "start": 0, "end": 4}]
    }"#;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_highlight_json() {
        let json = highlight_json("Fees apply.", RESULT).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["unit"], "char");
        assert_eq!(value["segments"][0]["text"], "Fees");
        assert_eq!(value["segments"][0]["id"], "r0-4");
        assert_eq!(value["rows"][0]["display_range"], "0–4");
    }

    #[test]
    fn test_bad_json_is_reported() {
        let err = highlight_json("text", "{not json").unwrap_err();
        assert!(err.starts_with("Invalid result JSON"));
        assert!(segments_json("text", "[{]").is_err());
    }

    #[test]
    fn test_normalize_json_word_unit() {
        let json = normalize_json(
            "one two three four",
            r#"[{"label": "x", "severity": "LOW", "start": 0, "end": 2}]"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["unit"], "word");
        assert_eq!(value["spans"][0]["start"], 0);
        assert_eq!(value["spans"][0]["end"], 7);
    }

    #[test]
    fn test_selection_severity() {
        assert_eq!(selection_severity(None), "low");
        assert_eq!(
            selection_severity(Some(r#"{"risk_count": 2, "highest_severity": "critical"}"#.into())),
            "critical"
        );
        assert_eq!(selection_severity(Some("garbage".into())), "low");
    }
}
