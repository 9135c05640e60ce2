//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Taxonomy
//!
//! - `Config`: missing/invalid credentials or unknown provider name; fatal at
//!   construction, never retried
//! - `Generation`: a remote call failed after retries or failed non-retryably;
//!   surfaced to the caller with the upstream message attached
//! - `Unsupported`: the configured provider lacks an optional capability
//! - `Annotation`: wraps a generation failure encountered mid-walk; the whole
//!   annotation aborts with no partial result
//!
//! Rate-limit-class failures are recognized by substring and are the only class
//! eligible for retry with backoff.

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompanionError>;

#[derive(Debug, Error)]
pub enum CompanionError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Provider '{provider}' does not support {capability}")]
    Unsupported {
        provider: String,
        capability: String,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// A client call failed mid-annotation; the whole request aborts.
    #[error("Annotation failed: {source}")]
    Annotation {
        #[source]
        source: Box<CompanionError>,
    },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Execution error: {0}")]
    Execution(String),
}

impl CompanionError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn unsupported(provider: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            capability: capability.into(),
        }
    }

    /// Wrap a per-unit client failure so the annotator aborts as a whole.
    pub fn annotation(source: CompanionError) -> Self {
        Self::Annotation {
            source: Box::new(source),
        }
    }

    /// Rate-limit-class errors are eligible for retry with backoff; every
    /// other failure surfaces immediately.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Generation(message) => is_rate_limit_message(message),
            _ => false,
        }
    }
}

/// Substring classifier for rate-limit-class upstream failures.
///
/// Covers the HTTP 429 family plus the vendor-specific markers the remote
/// providers emit in error bodies.
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();

    lower.contains("rate limit")
        || lower.contains("429")
        || lower.contains("too many requests")
        || lower.contains("quota")
        || lower.contains("consumption_limit_reached")
        || lower.contains("resource_exhausted")
}
