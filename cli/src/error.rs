//! Error types for the native client.
//!
//! - [`ConfigError`] - invalid `.env` / environment overrides
//! - [`CliError`] - top-level command errors
//!
//! Network failures stay [`WorkflowError`]s from `boltzmann-core`;
//! `From` conversions let `?` cross the boundary.

use boltzmann_core::{Failure, WorkflowError};
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while resolving endpoint settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A URL setting is not http(s).
    #[error("{name} must be an http(s) URL, got {value:?}")]
    NotHttp { name: &'static str, value: String },
}

// =============================================================================
// CLI Errors (top-level)
// =============================================================================

/// Errors returned by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Network step failed before reaching the session.
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Network step failed and the session recorded it.
    #[error("{0}")]
    Session(Failure),

    /// The workflow finished without producing the expected value.
    #[error("Workflow ended without a result: {0}")]
    Incomplete(String),

    /// Failed to build the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (reading images, binding sockets).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
