//! Error types for team access operations.

use thiserror::Error;

use crate::http::HttpError;

/// The main error type for team access operations.
#[derive(Error, Debug)]
pub enum TeamAccessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("team '{team}' not found in organization '{org}'")]
    TeamNotFound { org: String, team: String },

    #[error("gave up waiting for the rate limit to reset after {waits} waits")]
    RateLimitBudgetExhausted { waits: u32 },

    #[error("invalid permission '{0}' (expected read, write, admin, maintain or triage)")]
    InvalidPermission(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for team access operations.
pub type Result<T> = std::result::Result<T, TeamAccessError>;
