use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordinal risk level attached to a span.
///
/// Declaration order is rank order, so `Ord` compares by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Low,
    Med,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Med,
        Severity::High,
        Severity::Critical,
    ];

    /// Precedence used when several spans cover the same text
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Med => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    /// Wire form, as the analysis API emits it
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Med => "MED",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Lower-case form used for `data-sev` attributes and CSS classes
    pub fn css_name(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Med => "med",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse, falling back to `Low` for anything unrecognized
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MED" | "MEDIUM" => Ok(Severity::Med),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Severity::parse_lenient).unwrap_or_default())
    }
}

/// A labeled range over the analyzed text.
///
/// `start` is inclusive and `end` exclusive. The unit (UTF-16 code units or
/// word indices) is not declared by the API; see `span_engine::units`.
/// Offsets are signed because nothing stops the API from sending garbage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Span {
    pub fn new(label: impl Into<String>, severity: Severity, start: i64, end: i64) -> Self {
        Self {
            label: label.into(),
            severity,
            start,
            end,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Same span, different offsets
    pub fn with_range(&self, start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub risk_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_severity: Option<String>,
}

impl Summary {
    /// `highest_severity` is a free string on the wire
    pub fn highest(&self) -> Option<Severity> {
        self.highest_severity
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

/// One analysis response. Replaced wholesale on each new analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<serde_json::Value>,
}

/// Indexing basis of a batch of spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanUnit {
    Word,
    Char,
}

impl SpanUnit {
    /// Label shown next to the summary ("indices interpreted as ...")
    pub fn label(self) -> &'static str {
        match self {
            SpanUnit::Word => "word",
            SpanUnit::Char => "character",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzing,
    Complete,
    Error,
}

/// Cached outcome of the most recent analysis, keyed by status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LastAnalysis {
    Analyzing {
        text: String,
        updated_at: i64,
    },
    Complete {
        result: ApiResult,
        updated_at: i64,
    },
    Error {
        message: String,
        updated_at: i64,
    },
}

impl LastAnalysis {
    pub fn status(&self) -> AnalysisStatus {
        match self {
            LastAnalysis::Analyzing { .. } => AnalysisStatus::Analyzing,
            LastAnalysis::Complete { .. } => AnalysisStatus::Complete,
            LastAnalysis::Error { .. } => AnalysisStatus::Error,
        }
    }

    pub fn updated_at(&self) -> i64 {
        match self {
            LastAnalysis::Analyzing { updated_at, .. }
            | LastAnalysis::Complete { updated_at, .. }
            | LastAnalysis::Error { updated_at, .. } => *updated_at,
        }
    }
}
