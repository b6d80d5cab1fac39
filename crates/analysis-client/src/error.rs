//! Error types for the analysis client

use shared_types::{api, user_message_for_status};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Nothing to analyze")]
    EmptyInput,

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Single message fit for the user. The diagnostic detail (status code,
    /// raw body) belongs in the logs, not here.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::EmptyInput => "Paste some text or choose a file first.".to_string(),
            ClientError::TooLarge { .. } => api::TOO_LARGE_MESSAGE.to_string(),
            ClientError::Auth(_) => api::SIGN_IN_MESSAGE.to_string(),
            ClientError::Http { status, .. } => user_message_for_status(*status).to_string(),
            ClientError::Transport(_) => {
                "Could not reach the analysis service. Check your connection and try again."
                    .to_string()
            }
            ClientError::Decode(_) => {
                "The analysis service returned an unexpected response.".to_string()
            }
            ClientError::Io { path, .. } => format!("Could not read {}.", path.display()),
            ClientError::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
