//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//!
//! Note: credentials are never serialized back out and are redacted in debug
//! output; providers convert them to `SecretString` internally for runtime
//! protection.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::{CompanionError, Result};

/// Provider names the factory recognizes.
pub const SUPPORTED_PROVIDERS: &[&str] = &["mock", "gemini", "watsonx"];

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service display name
    pub app_name: String,

    /// HTTP listener settings
    pub server: ServerConfig,

    /// AI provider settings
    pub provider: ProviderConfig,

    /// Speech-to-text collaborator settings
    pub stt: SttConfig,

    /// Sandboxed execution settings
    pub exec: ExecConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Code Companion".to_string(),
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            stt: SttConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CompanionError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_PROVIDERS.contains(&self.provider.provider.as_str()) {
            return Err(CompanionError::Config(format!(
                "Unknown AI provider configured: {}. Supported: {}",
                self.provider.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )));
        }

        if self.provider.timeout_secs == 0 {
            return Err(CompanionError::Config(
                "provider timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(base) = &self.provider.api_base {
            url::Url::parse(base).map_err(|e| {
                CompanionError::Config(format!("provider api_base is not a valid URL: {e}"))
            })?;
        }

        if let Some(stt_url) = &self.stt.url {
            url::Url::parse(stt_url).map_err(|e| {
                CompanionError::Config(format!("stt url is not a valid URL: {e}"))
            })?;
        }

        if self.exec.timeout_secs == 0 {
            return Err(CompanionError::Config(
                "exec timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// AI provider selection and credentials.
///
/// Exactly one configuration is active per process; the client factory maps it
/// to exactly one memoized client instance.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider type: "mock", "gemini", "watsonx"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// API key; never serialized to output for security
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,
    /// Project scoping credential (watsonx only)
    pub project_id: Option<String>,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the initial attempt on rate-limit-class errors
    pub max_retries: u32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("project_id", &self.project_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            project_id: None,
            timeout_secs: constants::generation::DEFAULT_TIMEOUT_SECS,
            max_retries: constants::retry::DEFAULT_MAX_RETRIES,
        }
    }
}

// =============================================================================
// Speech-to-Text Configuration
// =============================================================================

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// API key; never serialized to output for security
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Service instance URL
    pub url: Option<String>,
}

impl SttConfig {
    /// Voice routes are enabled only when both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.url.is_some()
    }
}

impl std::fmt::Debug for SttConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SttConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .finish()
    }
}

// =============================================================================
// Execution Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Interpreter binary for snippet execution
    pub interpreter: String,
    /// Hard ceiling per run in seconds
    pub timeout_secs: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            interpreter: constants::exec::DEFAULT_INTERPRETER.to_string(),
            timeout_secs: constants::exec::RUN_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.provider, "mock");
        assert_eq!(config.provider.max_retries, 3);
        assert_eq!(config.exec.timeout_secs, 5);
    }

    #[test]
    fn unknown_provider_rejected() {
        let mut config = Config::default();
        config.provider.provider = "skynet".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CompanionError::Config(_)));
        assert!(err.to_string().contains("skynet"));
    }

    #[test]
    fn invalid_api_base_rejected() {
        let mut config = Config::default();
        config.provider.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn credentials_redacted_in_debug() {
        let config = ProviderConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn stt_configured_requires_both_fields() {
        let mut stt = SttConfig::default();
        assert!(!stt.is_configured());
        stt.api_key = Some("key".to_string());
        assert!(!stt.is_configured());
        stt.url = Some("https://stt.example.com".to_string());
        assert!(stt.is_configured());
    }
}
