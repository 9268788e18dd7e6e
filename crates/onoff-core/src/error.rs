//! Error types.

use thiserror::Error;

/// Errors raised while building a button from configuration.
#[derive(Debug, Error)]
pub enum OnOffError {
    #[error("Line width must be finite and positive, got {0}")]
    InvalidLineWidth(f64),
    #[error("Ring alpha must be within 0..=1, got {0}")]
    InvalidRingAlpha(f64),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for fallible button operations.
pub type OnOffResult<T> = Result<T, OnOffError>;
