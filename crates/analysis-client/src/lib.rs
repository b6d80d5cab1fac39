//! Client for the remote terms-of-service analysis service
//!
//! - [`client`]: the HTTP endpoints (text, plain text, file, summary, health)
//! - [`auth`]: bearer token sources
//! - [`race`]: summary preview racing the full result
//! - [`session`]: per-view state with latest-wins completion

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod race;
pub mod session;

pub use auth::{CachedToken, StaticToken, StoredToken, TokenProvider, TokenRefresher};
pub use client::{AnalysisClient, Health};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use race::{race_preview, RaceState};
pub use session::{AnalysisSession, Outcome, Ticket};
