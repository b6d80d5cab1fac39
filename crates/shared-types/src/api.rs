//! HTTP contract of the remote analysis service
//!
//! The service itself is not part of this workspace; this module only pins
//! down the paths, limits and failure-message format that the native client
//! and the WASM bindings both rely on.

/// Base URL used when nothing is configured
pub const DEFAULT_API_BASE: &str = "https://app.gertly.com";

/// Longest text (in characters) sent in a single analysis request
pub const MAX_TEXT_CHARS: usize = 200_000;

/// Largest file the service accepts for direct upload
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Analyze,
    AnalyzeRaw,
    AnalyzeFile,
    AnalyzeSummary,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::Analyze => "/v1/analyze",
            Endpoint::AnalyzeRaw => "/v1/analyze-raw",
            Endpoint::AnalyzeFile => "/v1/analyze-file",
            Endpoint::AnalyzeSummary => "/v1/analyze-summary",
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Endpoint::Health)
    }

    /// Join onto an API base, tolerating trailing slashes on the base
    pub fn url(self, api_base: &str) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.path())
    }
}

/// `Authorization` header value
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Cut `text` down to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the diagnostic for a non-2xx response.
///
/// JSON bodies are re-serialized compactly; anything else (including a body
/// that claims to be JSON but does not parse) is used as plain text, so
/// extracting the message never fails.
pub fn failure_message(
    status: u16,
    status_text: &str,
    content_type: Option<&str>,
    body: &str,
) -> String {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    let detail = if is_json {
        serde_json::from_str::<serde_json::Value>(body)
            .map(|value| value.to_string())
            .unwrap_or_else(|_| body.to_string())
    } else {
        body.to_string()
    };

    format!("{} {}: {}", status, status_text, detail)
}

pub const SIGN_IN_MESSAGE: &str = "Please sign in again to analyze documents.";
pub const TOO_LARGE_MESSAGE: &str = "That document is too large to analyze.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";
pub const SERVICE_FAILED_MESSAGE: &str =
    "The analysis service could not process this document. Please try again.";

/// What to tell the user about a failed request. Pair with
/// [`failure_message`], which goes to the logs instead.
pub fn user_message_for_status(status: u16) -> &'static str {
    match status {
        401 | 403 => SIGN_IN_MESSAGE,
        413 => TOO_LARGE_MESSAGE,
        429 => RATE_LIMITED_MESSAGE,
        _ => SERVICE_FAILED_MESSAGE,
    }
}
