//! IBM watsonx.ai Provider
//!
//! Remote provider over the text generation REST endpoint, scoped to a
//! project. Implements every optional capability except transcription, which
//! is served by the dedicated speech-to-text collaborator (`ai::stt`).
//!
//! The upstream emits `consumption_limit_reached` in rate-limited error
//! bodies; that marker makes the call eligible for retry with backoff.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AiClient, comment_or_placeholder, prompts, retry::retry_rate_limited};
use crate::config::ProviderConfig;
use crate::types::{CompanionError, Result, SkillLevel};

const DEFAULT_MODEL: &str = "ibm/granite-3-3-8b-instruct";
const API_VERSION: &str = "2024-05-31";

/// watsonx.ai provider with secure credential handling
pub struct WatsonxClient {
    /// Bearer credential - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    project_id: String,
    model: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for WatsonxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonxClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("project_id", &self.project_id)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl WatsonxClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("WATSONX_APIKEY").ok());
        let api_base = config
            .api_base
            .clone()
            .or_else(|| std::env::var("WATSONX_URL").ok());
        let project_id = config
            .project_id
            .clone()
            .or_else(|| std::env::var("WATSONX_PROJECT_ID").ok());

        let (Some(api_key), Some(api_base), Some(project_id)) = (api_key, api_base, project_id)
        else {
            return Err(CompanionError::Config(
                "IBM watsonx credentials are missing! Set WATSONX_APIKEY, WATSONX_URL and \
                 WATSONX_PROJECT_ID env vars or provide them in config"
                    .to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CompanionError::Generation(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base,
            project_id,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_retries: config.max_retries,
            client,
        })
    }

    /// One synchronous round trip to the generation endpoint.
    async fn generate_once(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/ml/v1/text/generation", self.api_base);
        let request = GenerationRequest {
            model_id: self.model.clone(),
            input: prompt.to_string(),
            parameters: GenerationParameters {
                decoding_method: "greedy".to_string(),
                max_new_tokens: max_tokens,
            },
            project_id: self.project_id.clone(),
        };

        debug!(model = %self.model, max_tokens, "Sending request to watsonx API");

        let response = self
            .client
            .post(&url)
            .query(&[("version", API_VERSION)])
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| CompanionError::Generation(format!("watsonx request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompanionError::Generation(format!(
                "watsonx API error ({status}): {body}"
            )));
        }

        let body: GenerationResponse = response.json().await.map_err(|e| {
            CompanionError::Generation(format!("Failed to parse watsonx response: {e}"))
        })?;

        body.results
            .into_iter()
            .next()
            .map(|r| r.generated_text)
            .ok_or_else(|| {
                CompanionError::Generation("No content in watsonx response".to_string())
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
impl AiClient for WatsonxClient {
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
        "watsonx"
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/ml/v1/foundation_model_specs", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("version", API_VERSION)])
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("watsonx API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("watsonx API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("watsonx API check failed: {e}");
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model_id: String,
    input: String,
    parameters: GenerationParameters,
    project_id: String,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    decoding_method: String,
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> ProviderConfig {
        ProviderConfig {
            provider: "watsonx".to_string(),
            api_key: Some("ibm-secret-credential".to_string()),
            api_base: Some("https://us-south.ml.cloud.ibm.com".to_string()),
            project_id: Some("project".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn construction_requires_all_three_credentials() {
        if std::env::var("WATSONX_APIKEY").is_ok() {
            return;
        }

        for strip in ["api_key", "api_base", "project_id"] {
            let mut config = full_config();
            match strip {
                "api_key" => config.api_key = None,
                "api_base" => config.api_base = None,
                _ => config.project_id = None,
            }
            let err = WatsonxClient::new(&config).unwrap_err();
            assert!(matches!(err, CompanionError::Config(_)), "strip {strip}");
        }
    }

    #[test]
    fn construction_succeeds_with_full_credentials() {
        let client = WatsonxClient::new(&full_config()).unwrap();
        assert_eq!(client.model, DEFAULT_MODEL);
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("ibm-secret-credential"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn response_shape_parses_generated_text() {
        let raw = r#"{"results": [{"generated_text": "Doubles the input"}]}"#;
        let parsed: GenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results[0].generated_text, "Doubles the input");
    }
}
