use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the recommendation service sends alongside a failing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseUpdateError {
    #[error("unknown preference field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a whole number for '{field}'")]
    InvalidNumber { field: String, value: String },
    #[error("'{value}' is not true/false for '{field}'")]
    InvalidFlag { field: String, value: String },
}
