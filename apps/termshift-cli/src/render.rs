//! Output formats for a highlight report

use clap::ValueEnum;
use crossterm::style::{Color, Stylize};
use span_engine::{style_for, summary_pills, HighlightReport};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Coloured document and flag list for the terminal
    Ansi,
    /// Standalone HTML fragment with `<mark>` highlights
    Html,
    /// The report as JSON
    Json,
    /// Plain flag list
    Text,
}

pub fn render(report: &HighlightReport, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Ansi => render_ansi(report),
        Format::Html => render_html(report),
        Format::Json => serde_json::to_string_pretty(report)?,
        Format::Text => report.flags_text(),
    })
}

/// `#rrggbb` to a terminal colour
fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn render_ansi(report: &HighlightReport) -> String {
    let mut out = String::new();

    for segment in &report.segments {
        match &segment.style {
            Some(style) => {
                let bg = hex_color(style.background_color).unwrap_or(Color::Yellow);
                let fg = hex_color(style.color).unwrap_or(Color::Black);
                out.push_str(&segment.text.as_str().on(bg).with(fg).to_string());
            }
            None => out.push_str(&segment.text),
        }
    }

    let (risks, highest) = summary_pills(Some(&report.summary));
    out.push_str(&format!(
        "\n\n{} · {} · indices interpreted as {} offsets\n",
        risks, highest, report.unit_label
    ));

    if report.rows.is_empty() {
        out.push_str("No flags found.\n");
    }
    for (i, row) in report.rows.iter().enumerate() {
        let badge = format!("[{}]", row.span.severity);
        let color = hex_color(style_for(row.span.severity).badge).unwrap_or(Color::Red);
        out.push_str(&format!(
            "{}. {} {} ({})\n",
            i + 1,
            badge.with(color).bold(),
            row.span.label,
            row.display_range
        ));
        if let Some(explanation) = &row.span.explanation {
            out.push_str(&format!("   {}\n", explanation));
        }
    }

    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML document view plus flag sidebar.
///
/// A span split across several segments carries its `id` on the first
/// segment only, so sidebar links have exactly one target.
pub fn render_html(report: &HighlightReport) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut viewer = String::new();

    for segment in &report.segments {
        let text = escape_html(&segment.text);
        let Some(style) = &segment.style else {
            viewer.push_str(&text);
            continue;
        };

        let mut attrs = format!(
            " data-sev=\"{}\" style=\"{}\"",
            style.severity.css_name(),
            style.to_css()
        );
        if let Some(id) = segment.id.as_deref() {
            if seen.insert(id) {
                attrs.push_str(&format!(" id=\"{}\"", id));
            }
        }
        if let Some(row) = segment.span_index.and_then(|i| report.rows.get(i)) {
            attrs.push_str(&format!(" title=\"{}\"", escape_html(&row.span.label)));
        }
        viewer.push_str(&format!("<mark{}>{}</mark>", attrs, text));
    }

    let (risks, highest) = summary_pills(Some(&report.summary));
    let mut sidebar = format!(
        "<p class=\"pills\"><span>{}</span> <span>{}</span></p>\n<p class=\"unit\">Indices interpreted as {} offsets.</p>\n",
        escape_html(&risks),
        escape_html(&highest),
        report.unit_label
    );

    if report.rows.is_empty() {
        sidebar.push_str("<p>No flags found.</p>\n");
    } else {
        sidebar.push_str("<ol>\n");
        for row in &report.rows {
            let label = escape_html(&row.span.label);
            let title = match &row.target_id {
                Some(id) => format!("<a href=\"#{}\">{}</a>", id, label),
                None => label,
            };
            sidebar.push_str(&format!(
                "<li class=\"sev-{}\">[{}] {} <span class=\"range\">{}</span><p>{}</p></li>\n",
                row.span.severity.css_name(),
                row.span.severity,
                title,
                row.display_range,
                escape_html(row.span.explanation.as_deref().unwrap_or("No explanation"))
            ));
        }
        sidebar.push_str("</ol>\n");
    }

    format!(
        "<div class=\"termshift-report\">\n<pre class=\"tos-viewer\" style=\"white-space: pre-wrap\">{}</pre>\n<aside class=\"flags\">\n{}</aside>\n</div>\n",
        viewer, sidebar
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{ApiResult, Severity, Span, Summary};
    use span_engine::SpanEngine;

    fn report(text: &str, spans: Vec<Span>) -> HighlightReport {
        let result = ApiResult {
            summary: Summary {
                risk_count: spans.len() as u32,
                highest_severity: Some("HIGH".to_string()),
            },
            spans,
            ..Default::default()
        };
        SpanEngine::new().highlight(text, &result)
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(
            hex_color("#ffe1e1"),
            Some(Color::Rgb {
                r: 0xff,
                g: 0xe1,
                b: 0xe1
            })
        );
        assert_eq!(hex_color("ffe1e1"), None);
        assert_eq!(hex_color("#fff"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_html_id_on_first_piece_only() {
        let report = report(
            "abcdefghijklmno",
            vec![
                Span::new("low", Severity::Low, 0, 10),
                Span::new("high", Severity::High, 5, 15),
            ],
        );
        let html = render_html(&report);

        assert_eq!(html.matches("id=\"r5-15\"").count(), 1);
        assert_eq!(html.matches("id=\"r0-10\"").count(), 1);
        assert_eq!(html.matches("<mark").count(), 3);
        assert!(html.contains("<a href=\"#r5-15\">high</a>"));
        assert!(html.contains("data-sev=\"high\""));
    }

    #[test]
    fn test_html_escapes_document_text() {
        let report = report("<script>x</script>", vec![]);
        let html = render_html(&report);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("No flags found."));
    }

    #[test]
    fn test_text_format_is_flag_list() {
        let report = report(
            "We may change these terms.",
            vec![Span::new("Unilateral changes", Severity::High, 0, 13).with_explanation("At will")],
        );
        assert_eq!(
            render(&report, Format::Text).unwrap(),
            "1. [HIGH] Unilateral changes — At will (range: 0–13)"
        );
    }

    #[test]
    fn test_json_format_parses() {
        let report = report("Fees apply.", vec![Span::new("Fees", Severity::Med, 0, 4)]);
        let json = render(&report, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["unit"], "char");
        assert_eq!(value["segments"][0]["text"], "Fees");
    }
}
