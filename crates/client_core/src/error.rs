//! Typed failures for preference persistence and recommendation retrieval.

use shared::error::ApiError;
use storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("saved preferences could not be decoded: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("preferences could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid recommendation service url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("recommendation request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("recommendation service answered HTTP {status}{}", status_detail(.detail))]
    Status {
        status: u16,
        detail: Option<ApiError>,
    },
    #[error("unexpected recommendation payload: {0}")]
    Shape(String),
    #[error("recommendation task ended without an outcome: {0}")]
    Interrupted(#[source] tokio::task::JoinError),
}

fn status_detail(detail: &Option<ApiError>) -> String {
    match detail {
        Some(api_error) if !api_error.message.is_empty() => format!(": {}", api_error.message),
        _ => String::new(),
    }
}

impl RecommendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RecommendError::Transport(err) if err.is_timeout())
    }

    /// Short text shown next to the form after a failed attempt.
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::Transport(_) if self.is_timeout() => {
                "Recommendation service timed out; try again.".to_string()
            }
            RecommendError::Transport(err) if err.is_connect() => {
                "Recommendation service unreachable; check the server URL/network and try again."
                    .to_string()
            }
            RecommendError::Transport(_) => {
                "Could not reach the recommendation service; try again.".to_string()
            }
            RecommendError::Status { status, .. } => {
                format!("Recommendation service error (HTTP {status}); try again.")
            }
            RecommendError::Shape(_) => {
                "Recommendation service sent an unexpected response; try again.".to_string()
            }
            RecommendError::Interrupted(_) => {
                "Recommendation request was interrupted; try again.".to_string()
            }
            RecommendError::InvalidBaseUrl(_) => {
                "Recommendation service URL is invalid; check your settings.".to_string()
            }
        }
    }
}
