//! Summary preview racing the full analysis

use crate::error::Result;
pub use shared_types::RaceState;
use shared_types::{ApiResult, Summary};
use std::future::Future;

/// Drive `preview` and `full` together.
///
/// The full result is polled first, so a preview resolving in the same poll
/// never overrides it. `preview` is dropped as soon as `full` resolves;
/// preview errors are logged and otherwise ignored.
pub async fn race_preview<P, Q, F>(preview: P, full: Q, mut on_state: F) -> Result<ApiResult>
where
    P: Future<Output = Result<Summary>>,
    Q: Future<Output = Result<ApiResult>>,
    F: FnMut(&RaceState),
{
    let mut state = RaceState::Pending;
    let mut preview_open = true;
    tokio::pin!(preview);
    tokio::pin!(full);

    loop {
        tokio::select! {
            biased;
            result = &mut full => {
                let result = result?;
                if state.on_full(result.clone()) {
                    on_state(&state);
                }
                return Ok(result);
            }
            summary = &mut preview, if preview_open => {
                preview_open = false;
                match summary {
                    Ok(summary) => {
                        if state.on_preview(summary) {
                            on_state(&state);
                        }
                    }
                    Err(e) => tracing::debug!("Preview request failed: {}", e),
                }
            }
        }
    }
}
