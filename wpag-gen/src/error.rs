//! Error types for wpag-gen
//!
//! Denials from the license gate are not errors; they come back as
//! `false` or [`crate::orchestrator::RunOutcome::Denied`].

use thiserror::Error;

use crate::services::completion_client::CompletionError;
use crate::services::wordpress_client::WpError;

/// Crate-level error type
#[derive(Debug, Error)]
pub enum GenError {
    /// Missing or invalid configuration, detected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input (blank topic, unknown technology name)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// WordPress REST API failure
    #[error("WordPress error: {0}")]
    WordPress(#[from] WpError),

    /// Completion API failure
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// wpag-common error
    #[error("Common error: {0}")]
    Common(#[from] wpag_common::Error),
}

/// Result type for wpag-gen operations
pub type GenResult<T> = Result<T, GenError>;
