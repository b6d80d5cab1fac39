//! One document view: its text, the analysis in flight and the last outcome
//!
//! Overlapping analyses resolve latest-wins. Each `begin` hands out a new
//! ticket; a completion carrying any other ticket is discarded. Editing the
//! text also invalidates whatever is in flight.

use crate::error::ClientError;
use shared_types::{ApiResult, LastAnalysis, Summary};
use span_engine::{HighlightReport, SpanEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Complete(ApiResult),
    /// User-facing message
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    text: String,
    generation: u64,
    in_flight: Option<Ticket>,
    preview: Option<Summary>,
    outcome: Option<Outcome>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. A changed text clears the result and abandons any
    /// analysis of the old text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.generation += 1;
        self.in_flight = None;
        self.preview = None;
        self.outcome = None;
    }

    pub fn can_analyze(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start an analysis of the current text; `None` when there is nothing
    /// to analyze. Supersedes any analysis already in flight.
    pub fn begin(&mut self) -> Option<Ticket> {
        if !self.can_analyze() {
            return None;
        }
        if let Some(previous) = self.in_flight {
            tracing::debug!("Analysis {:?} superseded", previous);
        }
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.in_flight = Some(ticket);
        self.preview = None;
        self.outcome = None;
        Some(ticket)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket)
    }

    pub fn apply_preview(&mut self, ticket: Ticket, summary: Summary) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.preview = Some(summary);
        true
    }

    /// Record the outcome for `ticket`. Returns false (and changes nothing)
    /// if the ticket has been superseded.
    pub fn complete(&mut self, ticket: Ticket, result: Result<ApiResult, ClientError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale analysis {:?}", ticket);
            return false;
        }

        self.in_flight = None;
        self.preview = None;
        self.outcome = Some(match result {
            Ok(result) => Outcome::Complete(result),
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                Outcome::Failed(e.user_message())
            }
        });
        true
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&ApiResult> {
        match &self.outcome {
            Some(Outcome::Complete(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// Summary to show: the full result's, else the preview's
    pub fn summary(&self) -> Option<&Summary> {
        self.result()
            .map(|r| &r.summary)
            .or(self.preview.as_ref())
    }

    pub fn highlight(&self) -> Option<HighlightReport> {
        self.result()
            .map(|result| SpanEngine::new().highlight(&self.text, result))
    }

    /// Snapshot for the last-analysis cache, `now_ms` in epoch milliseconds
    pub fn to_last_analysis(&self, now_ms: i64) -> Option<LastAnalysis> {
        if self.is_busy() {
            return Some(LastAnalysis::Analyzing {
                text: self.text.clone(),
                updated_at: now_ms,
            });
        }
        match &self.outcome {
            Some(Outcome::Complete(result)) => Some(LastAnalysis::Complete {
                result: result.clone(),
                updated_at: now_ms,
            }),
            Some(Outcome::Failed(message)) => Some(LastAnalysis::Error {
                message: message.clone(),
                updated_at: now_ms,
            }),
            None => None,
        }
    }
}
