pub mod api;
pub mod race;
pub mod types;

pub use api::{
    bearer, failure_message, truncate_chars, user_message_for_status, Endpoint,
    DEFAULT_API_BASE, MAX_TEXT_CHARS, MAX_UPLOAD_BYTES,
};
pub use race::RaceState;
pub use types::{
    AnalysisStatus, ApiResult, LastAnalysis, ParseSeverityError, Severity, Span, SpanUnit,
    Summary,
};
