//! Google Gemini API Provider
//!
//! Remote provider over the `generateContent` REST endpoint. Rate-limit-class
//! failures are retried with backoff; everything else surfaces immediately
//! with the upstream message attached.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AiClient, comment_or_placeholder, prompts, retry::retry_rate_limited};
use crate::config::ProviderConfig;
use crate::types::{CompanionError, Result, SkillLevel};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini API provider with secure API key handling
pub struct GeminiClient {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                CompanionError::Config(
                    "Gemini API key not found. Set GEMINI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CompanionError::Generation(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            max_retries: config.max_retries,
            client,
        })
    }

    /// One synchronous round trip to the generation endpoint.
    async fn generate_once(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: max_tokens,
            },
        };

        debug!(model = %self.model, max_tokens, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| CompanionError::Generation(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompanionError::Generation(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            CompanionError::Generation(format!("Failed to parse Gemini response: {e}"))
        })?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                CompanionError::Generation("No content in Gemini response".to_string())
            })
    }

    async fn generate(&self, prompt: String, max_tokens: u32) -> Result<String> {
        retry_rate_limited(self.name(), self.max_retries, || {
            self.generate_once(&prompt, max_tokens)
        })
        .await
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn get_comment(&self, code: &str, level: SkillLevel) -> Result<String> {
        let output = self
            .generate(
                prompts::comment_prompt(code, level),
                prompts::comment_budget(level),
            )
            .await?;
        Ok(comment_or_placeholder(&output))
    }

    async fn get_documentation(&self, code: &str, level: SkillLevel) -> Result<String> {
        let output = self
            .generate(
                prompts::documentation_prompt(code, level),
                prompts::documentation_budget(level),
            )
            .await?;
        Ok(output.trim().to_string())
    }

    async fn get_debug(&self, code: &str, level: SkillLevel) -> Result<String> {
        let output = self
            .generate(
                prompts::debug_prompt(code, level),
                prompts::debug_budget(level),
            )
            .await?;
        Ok(output.trim().to_string())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Gemini API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gemini API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gemini API check failed: {e}");
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_requires_api_key() {
        // Guard against ambient credentials leaking into the test.
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return;
        }

        let config = ProviderConfig {
            provider: "gemini".to_string(),
            ..Default::default()
        };
        let err = GeminiClient::new(&config).unwrap_err();
        assert!(matches!(err, CompanionError::Config(_)));
    }

    #[test]
    fn construction_uses_configured_key_and_defaults() {
        let config = ProviderConfig {
            provider: "gemini".to_string(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.api_base, DEFAULT_API_BASE);
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[test]
    fn response_shape_parses() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Adds two numbers"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Adds two numbers");
    }
}
