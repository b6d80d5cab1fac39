//! Severity → presentation tables
//!
//! Every table is an exhaustive `match`, so adding a severity without
//! styling it is a compile error.

use serde::Serialize;
use shared_types::Severity;

/// Colours for one severity across the rendering surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    /// Document view highlight background
    pub background: &'static str,
    /// Sidebar badge text
    pub text: &'static str,
    /// In-page `<mark>` background (extension)
    pub mark_background: &'static str,
    /// In-page `<mark>` outline (extension)
    pub mark_outline: &'static str,
    /// Popup badge colour (extension)
    pub badge: &'static str,
}

pub fn style_for(severity: Severity) -> SeverityStyle {
    match severity {
        Severity::Low => SeverityStyle {
            background: "#e6f8e8",
            text: "#166534",
            mark_background: "rgba(255,215,0,.18)",
            mark_outline: "rgba(255,215,0,.35)",
            badge: "#22c55e",
        },
        Severity::Med => SeverityStyle {
            background: "#fff2cc",
            text: "#7a5e00",
            mark_background: "rgba(255,165,0,.18)",
            mark_outline: "rgba(255,165,0,.35)",
            badge: "#f59e0b",
        },
        Severity::High => SeverityStyle {
            background: "#ffe1e1",
            text: "#9b1c1c",
            mark_background: "rgba(255,0,0,.18)",
            mark_outline: "rgba(255,0,0,.35)",
            badge: "#ef4444",
        },
        Severity::Critical => SeverityStyle {
            background: "#fecaca",
            text: "#7f1d1d",
            mark_background: "rgba(139,0,0,.28)",
            mark_outline: "rgba(139,0,0,.5)",
            badge: "#b91c1c",
        },
    }
}

/// Style attached to a highlighted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightStyle {
    pub severity: Severity,
    pub background_color: &'static str,
    pub color: &'static str,
}

impl HighlightStyle {
    pub fn for_severity(severity: Severity) -> Self {
        let style = style_for(severity);
        Self {
            severity,
            background_color: style.background,
            color: style.text,
        }
    }

    /// Inline CSS for the document view
    pub fn to_css(&self) -> String {
        format!(
            "background-color: {}; padding: 0 2px; border-radius: 2px",
            self.background_color
        )
    }
}

/// Stylesheet rules for in-page `<mark data-sev=..>` highlights
pub fn mark_stylesheet(class_name: &str) -> String {
    Severity::ALL
        .iter()
        .map(|&severity| {
            let style = style_for(severity);
            format!(
                "mark.{}[data-sev=\"{}\"] {{ background: {}; outline: 1px solid {}; }}",
                class_name,
                severity.css_name(),
                style.mark_background,
                style.mark_outline
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
