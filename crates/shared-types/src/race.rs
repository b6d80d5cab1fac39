//! Outcome of a summary preview racing the full analysis

use crate::types::{ApiResult, Summary};

/// Where a preview/full pair stands.
///
/// Allowed transitions: `Pending → PreviewArrived`, `Pending → FullArrived`,
/// `PreviewArrived → FullArrived`. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RaceState {
    #[default]
    Pending,
    PreviewArrived(Summary),
    FullArrived(ApiResult),
}

impl RaceState {
    /// Returns false when the preview came too late
    pub fn on_preview(&mut self, summary: Summary) -> bool {
        match self {
            RaceState::Pending => {
                *self = RaceState::PreviewArrived(summary);
                true
            }
            RaceState::PreviewArrived(_) | RaceState::FullArrived(_) => false,
        }
    }

    pub fn on_full(&mut self, result: ApiResult) -> bool {
        match self {
            RaceState::Pending | RaceState::PreviewArrived(_) => {
                *self = RaceState::FullArrived(result);
                true
            }
            RaceState::FullArrived(_) => false,
        }
    }

    /// Summary to display right now, if any
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            RaceState::Pending => None,
            RaceState::PreviewArrived(summary) => Some(summary),
            RaceState::FullArrived(result) => Some(&result.summary),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RaceState::FullArrived(_))
    }
}
