//! AI Client Abstraction
//!
//! Defines the [`AiClient`] capability trait every provider implements, the
//! factory that maps configuration to a concrete provider, and the memoized
//! handle that owns the single client instance for the process lifetime.
//!
//! ## Modules
//!
//! - `mock`: canned responses for tests and local development, no I/O
//! - `gemini` / `watsonx`: remote providers over REST
//! - `retry`: rate-limit retry loop with exponential backoff
//! - `stt`: speech-to-text collaborator (not an `AiClient`)

pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod retry;
pub mod stt;
pub mod watsonx;

pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use stt::WatsonSttClient;
pub use watsonx::WatsonxClient;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::ProviderConfig;
use crate::constants::generation::EMPTY_COMMENT_PLACEHOLDER;
use crate::types::{CompanionError, Result, SkillLevel};

/// Shared client type handed to request-handling code.
pub type SharedClient = Arc<dyn AiClient + Send + Sync>;

// =============================================================================
// AI Client Trait
// =============================================================================

/// Capability interface for AI providers.
///
/// `get_comment` is the one mandatory capability; the rest are optional
/// extensions that fail with [`CompanionError::Unsupported`] rather than
/// silently no-op. Implementations are fully interchangeable; callers hold a
/// [`SharedClient`] and never branch on the concrete provider type.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Generate a review comment for `code` at the requested skill level.
    async fn get_comment(&self, code: &str, level: SkillLevel) -> Result<String>;

    /// Generate documentation for `code` (optional capability).
    async fn get_documentation(&self, _code: &str, _level: SkillLevel) -> Result<String> {
        Err(CompanionError::unsupported(self.name(), "documentation"))
    }

    /// Generate debugging assistance for `code` (optional capability).
    async fn get_debug(&self, _code: &str, _level: SkillLevel) -> Result<String> {
        Err(CompanionError::unsupported(self.name(), "debugging"))
    }

    /// Transcribe raw audio to text (optional capability).
    async fn transcribe_audio(&self, _audio: &[u8]) -> Result<String> {
        Err(CompanionError::unsupported(self.name(), "transcription"))
    }

    /// Line-annotate mode: one comment call over the whole snippet, zipped
    /// back onto the code line-by-line. See [`zip_line_comments`].
    async fn get_line_comments(&self, code: &str, level: SkillLevel) -> Result<String> {
        let comment = self.get_comment(code, level).await?;
        Ok(zip_line_comments(code, &comment))
    }

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Check if the provider is available
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

// =============================================================================
// Factory & Memoized Handle
// =============================================================================

/// Create a client from configuration.
///
/// Deterministic mapping from the provider name to a constructor. Remote
/// constructors validate their required credentials and fail fast with
/// `CompanionError::Config`; that check runs once here, not per call.
pub fn create_client(config: &ProviderConfig) -> Result<SharedClient> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockClient::new())),
        "gemini" => Ok(Arc::new(GeminiClient::new(config)?)),
        "watsonx" => Ok(Arc::new(WatsonxClient::new(config)?)),
        other => Err(CompanionError::Config(format!(
            "Unknown AI provider configured: {other}. Supported: mock, gemini, watsonx"
        ))),
    }
}

/// Lazily-initialized holder for the process-wide client instance.
///
/// One configuration is active per process; the first `get` constructs the
/// client under a single-flight guard, every later `get` returns the same
/// instance. Passed by handle into request-handling code instead of living in
/// ambient global state.
pub struct ClientHandle {
    config: ProviderConfig,
    cell: OnceCell<SharedClient>,
}

impl ClientHandle {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Resolve the configured client, constructing it on first use.
    pub async fn get(&self) -> Result<SharedClient> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                info!(provider = %self.config.provider, "Constructing AI client");
                create_client(&self.config)
            })
            .await?;
        Ok(Arc::clone(client))
    }
}

// =============================================================================
// Shared Output Helpers
// =============================================================================

/// Zip multi-line model output onto the code lines by index.
///
/// If the model produced fewer lines than the code, the final model line is
/// repeated for all remaining code lines. This is a documented best-effort
/// heuristic, not a precise mapping: nothing guarantees the model emitted one
/// comment per input line.
pub fn zip_line_comments(code: &str, output: &str) -> String {
    let comment_lines: Vec<&str> = output.lines().collect();
    let fallback = comment_lines.last().copied().unwrap_or(output);

    code.lines()
        .enumerate()
        .map(|(i, line)| {
            let comment = comment_lines.get(i).copied().unwrap_or(fallback);
            format!("{line}  # {comment}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute the fixed placeholder for blank model output.
pub(crate) fn comment_or_placeholder(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        EMPTY_COMMENT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}
