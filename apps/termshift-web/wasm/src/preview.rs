//! Preview/full race as seen from JS
//!
//! The page fires the summary and full requests itself and reports each
//! response here; the return value says whether to render it.

use shared_types::{ApiResult, RaceState, Summary};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Default)]
pub struct PreviewRace {
    state: RaceState,
}

impl PreviewRace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn accept_preview(&mut self, summary_json: &str) -> Result<bool, String> {
        let summary = parse_summary(summary_json)?;
        Ok(self.state.on_preview(summary))
    }

    pub fn accept_full(&mut self, result_json: &str) -> Result<bool, String> {
        let result: ApiResult =
            serde_json::from_str(result_json).map_err(|e| format!("Invalid result JSON: {}", e))?;
        Ok(self.state.on_full(result))
    }
}

/// The summary endpoint answers `{summary: {...}}` or the bare summary
fn parse_summary(json: &str) -> Result<Summary, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid summary JSON: {}", e))?;
    let inner = match value.get("summary") {
        Some(summary) => summary.clone(),
        None => value,
    };
    serde_json::from_value(inner).map_err(|e| format!("Invalid summary JSON: {}", e))
}

#[wasm_bindgen]
impl PreviewRace {
    #[wasm_bindgen(constructor)]
    pub fn new_wasm() -> Self {
        Self::new()
    }

    /// True when the preview should be shown
    #[wasm_bindgen(js_name = onPreview)]
    pub fn on_preview_wasm(&mut self, summary_json: &str) -> Result<bool, JsValue> {
        self.accept_preview(summary_json)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = onFull)]
    pub fn on_full_wasm(&mut self, result_json: &str) -> Result<bool, JsValue> {
        self.accept_full(result_json).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = isFinal)]
    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    /// Summary to show now, as JSON
    #[wasm_bindgen(js_name = getSummaryJson)]
    pub fn get_summary_json(&self) -> Option<String> {
        self.state
            .summary()
            .and_then(|summary| serde_json::to_string(summary).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_then_full() {
        let mut race = PreviewRace::new();
        assert!(race.get_summary_json().is_none());

        assert!(race
            .accept_preview(r#"{"summary": {"risk_count": 4, "highest_severity": "MED"}}"#)
            .unwrap());
        assert_eq!(race.state().summary().map(|s| s.risk_count), Some(4));

        assert!(race
            .accept_full(r#"{"summary": {"risk_count": 5}, "spans": []}"#)
            .unwrap());
        assert!(race.is_final());
        assert_eq!(race.state().summary().map(|s| s.risk_count), Some(5));
    }

    #[test]
    fn test_late_preview_rejected() {
        let mut race = PreviewRace::new();
        race.accept_full(r#"{"summary": {"risk_count": 1}}"#).unwrap();
        assert!(!race.accept_preview(r#"{"risk_count": 9}"#).unwrap());
        assert_eq!(race.state().summary().map(|s| s.risk_count), Some(1));
    }

    #[test]
    fn test_bare_summary_accepted() {
        assert_eq!(parse_summary(r#"{"risk_count": 2}"#).unwrap().risk_count, 2);
        assert!(parse_summary("nope").is_err());
    }
}
