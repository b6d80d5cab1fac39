use serde::Serialize;
use shared_types::{ApiResult, Severity, Summary};
use span_engine::{flags_text, summary_pills, SidebarRow, SpanEngine};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Serialize)]
pub struct FlagItem {
    pub id: String,
    pub row: SidebarRow,
    pub is_selected: bool,
}

/// Sidebar state for one analysis: flags, selection and summary pills
#[wasm_bindgen]
pub struct FlagsPanel {
    flags: Vec<FlagItem>,
    selected_id: Option<String>,
    summary: Option<Summary>,
    unit_label: &'static str,
}

impl Default for FlagsPanel {
    fn default() -> Self {
        Self {
            flags: Vec::new(),
            selected_id: None,
            summary: None,
            unit_label: "character",
        }
    }
}

impl FlagsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rows(&mut self, rows: Vec<SidebarRow>) {
        self.flags = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| FlagItem {
                id: format!("flag-{}", idx),
                row,
                is_selected: false,
            })
            .collect();
        self.selected_id = None;
    }

    /// Load a result computed for `text`
    pub fn load(&mut self, text: &str, result: &ApiResult) {
        let report = SpanEngine::new().highlight(text, result);
        self.unit_label = report.unit_label;
        self.summary = Some(report.summary);
        self.set_rows(report.rows);
    }

    pub fn rows(&self) -> Vec<&SidebarRow> {
        self.flags.iter().map(|item| &item.row).collect()
    }

    pub fn filter_by_severity(&self, severity: Severity) -> Vec<&FlagItem> {
        self.flags
            .iter()
            .filter(|item| item.row.span.severity == severity)
            .collect()
    }

    pub fn count(&self, severity: Severity) -> u32 {
        self.filter_by_severity(severity).len() as u32
    }

    pub fn select(&mut self, id: &str) {
        for item in &mut self.flags {
            item.is_selected = false;
        }

        if let Some(item) = self.flags.iter_mut().find(|item| item.id == id) {
            item.is_selected = true;
            self.selected_id = Some(id.to_string());
        } else {
            self.selected_id = None;
        }
    }

    pub fn selected(&self) -> Option<&FlagItem> {
        self.selected_id
            .as_ref()
            .and_then(|id| self.flags.iter().find(|item| &item.id == id))
    }

    pub fn pills(&self) -> (String, String) {
        summary_pills(self.summary.as_ref())
    }

    pub fn export_text(&self) -> String {
        let rows: Vec<SidebarRow> = self.flags.iter().map(|item| item.row.clone()).collect();
        flags_text(&rows)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.flags).unwrap_or_default()
    }
}

// WASM bindings
#[wasm_bindgen]
impl FlagsPanel {
    #[wasm_bindgen(constructor)]
    pub fn new_wasm() -> Self {
        Self::new()
    }

    #[wasm_bindgen(js_name = loadResult)]
    pub fn load_result_wasm(&mut self, text: &str, result_json: &str) -> Result<(), JsValue> {
        let result: ApiResult = serde_json::from_str(result_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid result JSON: {}", e)))?;
        self.load(text, &result);
        Ok(())
    }

    #[wasm_bindgen(js_name = getFlagsJson)]
    pub fn get_flags_json(&self) -> String {
        self.to_json()
    }

    #[wasm_bindgen(js_name = getFlagsBySeverityJson)]
    pub fn get_flags_by_severity_json(&self, severity: &str) -> String {
        let severity = Severity::parse_lenient(severity);
        serde_json::to_string(&self.filter_by_severity(severity)).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = getCount)]
    pub fn get_count(&self, severity: &str) -> u32 {
        self.count(Severity::parse_lenient(severity))
    }

    #[wasm_bindgen(js_name = getTotalCount)]
    pub fn get_total_count(&self) -> u32 {
        self.flags.len() as u32
    }

    #[wasm_bindgen(js_name = selectFlag)]
    pub fn select_flag_wasm(&mut self, id: &str) {
        self.select(id);
    }

    /// Segment id to scroll to for the selected flag
    #[wasm_bindgen(js_name = getSelectedTarget)]
    pub fn get_selected_target(&self) -> Option<String> {
        self.selected().and_then(|item| item.row.target_id.clone())
    }

    #[wasm_bindgen(js_name = getSelectedJson)]
    pub fn get_selected_json(&self) -> Option<String> {
        self.selected()
            .and_then(|item| serde_json::to_string(item).ok())
    }

    #[wasm_bindgen(js_name = getRisksPill)]
    pub fn get_risks_pill(&self) -> String {
        self.pills().0
    }

    #[wasm_bindgen(js_name = getHighestPill)]
    pub fn get_highest_pill(&self) -> String {
        self.pills().1
    }

    #[wasm_bindgen(js_name = getUnitLabel)]
    pub fn get_unit_label(&self) -> String {
        self.unit_label.to_string()
    }

    /// Content for "copy flags"
    #[wasm_bindgen(js_name = getFlagsText)]
    pub fn get_flags_text(&self) -> String {
        self.export_text()
    }

    #[wasm_bindgen(js_name = clearFlags)]
    pub fn clear_flags(&mut self) {
        self.flags.clear();
        self.selected_id = None;
        self.summary = None;
        self.unit_label = "character";
    }
}
