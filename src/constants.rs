//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Remote generation retry behavior
pub mod retry {
    /// Default maximum retries after the initial attempt
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Exponential backoff base: the delay before retrying after the n-th
    /// failed attempt (0-based) is `BACKOFF_BASE_SECS ^ n` seconds (1s, 2s, 4s, ...)
    pub const BACKOFF_BASE_SECS: u64 = 2;
}

/// Remote generation output handling
pub mod generation {
    /// Substituted when a provider returns empty or whitespace-only output
    pub const EMPTY_COMMENT_PLACEHOLDER: &str = "No comment generated";

    /// Default outbound request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
}

/// Sandboxed snippet execution
pub mod exec {
    /// Hard ceiling for a single snippet run (seconds)
    pub const RUN_TIMEOUT_SECS: u64 = 5;

    /// Interpreter invoked for snippet execution
    pub const DEFAULT_INTERPRETER: &str = "python3";
}

/// Voice comment handling
pub mod voice {
    /// Recordings below this many decoded bytes are rejected as silent
    pub const MIN_AUDIO_BYTES: usize = 1000;

    /// Content type the frontend records in
    pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";
}
