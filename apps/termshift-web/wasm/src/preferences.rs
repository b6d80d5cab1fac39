//! localStorage-backed UI preferences and the last-analysis cache

use serde::{Deserialize, Serialize};
use shared_types::{ApiResult, LastAnalysis};
use wasm_bindgen::prelude::*;

pub const PREFERENCES_KEY: &str = "termshift_preferences";
pub const LAST_ANALYSIS_KEY: &str = "termshift_last_analysis";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// Follow `prefers-color-scheme`
    #[default]
    System,
    Light,
    Dark,
}

impl DarkMode {
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            DarkMode::System => system_prefers_dark,
            DarkMode::Light => false,
            DarkMode::Dark => true,
        }
    }

    /// Explicit choice opposite to what is currently shown
    pub fn toggled(self, system_prefers_dark: bool) -> Self {
        if self.is_dark(system_prefers_dark) {
            DarkMode::Light
        } else {
            DarkMode::Dark
        }
    }

    /// Unknown values fall back to `System`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => DarkMode::Light,
            "dark" => DarkMode::Dark,
            _ => DarkMode::System,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub sidebar_collapsed: bool,
    pub dark_mode: DarkMode,
}

impl Preferences {
    /// Missing or corrupt values give the defaults
    pub fn from_json(raw: Option<&str>) -> Self {
        raw.and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Cached analysis, dropped if it no longer parses
pub fn parse_last_analysis(raw: Option<&str>) -> Option<LastAnalysis> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
}

/// Build a cache entry. `payload` is the text for `analyzing`, the result
/// JSON for `complete` and the message for `error`.
pub fn build_last_analysis(status: &str, payload: &str, now_ms: i64) -> Result<LastAnalysis, String> {
    match status {
        "analyzing" => Ok(LastAnalysis::Analyzing {
            text: payload.to_string(),
            updated_at: now_ms,
        }),
        "complete" => {
            let result: ApiResult = serde_json::from_str(payload)
                .map_err(|e| format!("Invalid result JSON: {}", e))?;
            Ok(LastAnalysis::Complete {
                result,
                updated_at: now_ms,
            })
        }
        "error" => Ok(LastAnalysis::Error {
            message: payload.to_string(),
            updated_at: now_ms,
        }),
        other => Err(format!("Unknown analysis status: {}", other)),
    }
}

fn storage() -> Result<web_sys::Storage, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    window
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("No localStorage"))
}

fn read_preferences(storage: &web_sys::Storage) -> Result<Preferences, JsValue> {
    let raw = storage.get_item(PREFERENCES_KEY)?;
    Ok(Preferences::from_json(raw.as_deref()))
}

fn write_preferences(storage: &web_sys::Storage, prefs: &Preferences) -> Result<(), JsValue> {
    storage.set_item(PREFERENCES_KEY, &prefs.to_json())
}

fn system_prefers_dark(window: &web_sys::Window) -> bool {
    window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

/// Stored preferences as JSON
#[wasm_bindgen(js_name = loadPreferences)]
pub fn load_preferences() -> Result<String, JsValue> {
    Ok(read_preferences(&storage()?)?.to_json())
}

#[wasm_bindgen(js_name = setSidebarCollapsed)]
pub fn set_sidebar_collapsed(collapsed: bool) -> Result<(), JsValue> {
    let storage = storage()?;
    let mut prefs = read_preferences(&storage)?;
    prefs.sidebar_collapsed = collapsed;
    write_preferences(&storage, &prefs)
}

#[wasm_bindgen(js_name = setDarkMode)]
pub fn set_dark_mode(mode: &str) -> Result<bool, JsValue> {
    let storage = storage()?;
    let mut prefs = read_preferences(&storage)?;
    prefs.dark_mode = DarkMode::parse(mode);
    write_preferences(&storage, &prefs)?;
    apply_theme()
}

/// Flip the theme; returns whether dark mode is now on
#[wasm_bindgen(js_name = toggleDarkMode)]
pub fn toggle_dark_mode() -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let storage = storage()?;
    let mut prefs = read_preferences(&storage)?;
    prefs.dark_mode = prefs.dark_mode.toggled(system_prefers_dark(&window));
    write_preferences(&storage, &prefs)?;
    apply_theme()
}

/// Set or clear `data-theme="dark"` on the root element
#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme() -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let prefs = read_preferences(&storage()?)?;
    let dark = prefs.dark_mode.is_dark(system_prefers_dark(&window));

    let root = window
        .document()
        .ok_or("No document")?
        .document_element()
        .ok_or("No root element")?;
    if dark {
        root.set_attribute("data-theme", "dark")?;
    } else {
        root.remove_attribute("data-theme")?;
    }
    Ok(dark)
}

#[wasm_bindgen(js_name = saveLastAnalysis)]
pub fn save_last_analysis(json: &str) -> Result<(), JsValue> {
    let analysis: LastAnalysis = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid analysis: {}", e)))?;
    let json = serde_json::to_string(&analysis).map_err(|e| JsValue::from_str(&e.to_string()))?;
    storage()?.set_item(LAST_ANALYSIS_KEY, &json)
}

/// Record the current analysis state, stamped with `Date.now()`
#[wasm_bindgen(js_name = recordAnalysis)]
pub fn record_analysis(status: &str, payload: &str) -> Result<(), JsValue> {
    let now_ms = js_sys::Date::now() as i64;
    let analysis =
        build_last_analysis(status, payload, now_ms).map_err(|e| JsValue::from_str(&e))?;
    let json = serde_json::to_string(&analysis).map_err(|e| JsValue::from_str(&e.to_string()))?;
    storage()?.set_item(LAST_ANALYSIS_KEY, &json)
}

#[wasm_bindgen(js_name = loadLastAnalysis)]
pub fn load_last_analysis() -> Result<Option<String>, JsValue> {
    let raw = storage()?.get_item(LAST_ANALYSIS_KEY)?;
    Ok(parse_last_analysis(raw.as_deref()).and_then(|a| serde_json::to_string(&a).ok()))
}

#[wasm_bindgen(js_name = clearLastAnalysis)]
pub fn clear_last_analysis() -> Result<(), JsValue> {
    storage()?.remove_item(LAST_ANALYSIS_KEY)
}
