//! IBM Watson Speech-to-Text
//!
//! Dedicated transcription collaborator for the voice workflow. Kept apart
//! from the generation providers because it talks to a different IBM service
//! with its own credentials and auth scheme (basic auth with the literal
//! username "apikey").

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::config::SttConfig;
use crate::types::{CompanionError, Result};

const RECOGNIZE_MODEL: &str = "en-US_BroadbandModel";

/// Watson STT client with secure credential handling
pub struct WatsonSttClient {
    api_key: SecretString,
    url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for WatsonSttClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonSttClient")
            .field("api_key", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

impl WatsonSttClient {
    pub fn new(config: &SttConfig) -> Result<Self> {
        let (Some(api_key), Some(url)) = (config.api_key.clone(), config.url.clone()) else {
            return Err(CompanionError::Config(
                "IBM Watson Speech-to-Text credentials missing! Set stt.api_key and stt.url \
                 in config or the CODECOMPANION_STT__* env vars"
                    .to_string(),
            ));
        };

        Ok(Self {
            api_key: SecretString::from(api_key),
            url,
            client: reqwest::Client::new(),
        })
    }

    /// Transcribes an audio payload, returning the top hypothesis.
    ///
    /// Silent or unintelligible audio is not an error: the service returns an
    /// empty result list and the caller gets the "No speech detected" marker.
    pub async fn transcribe(&self, audio: &[u8], content_type: &str) -> Result<String> {
        let url = format!("{}/v1/recognize", self.url);

        debug!(bytes = audio.len(), content_type, "Sending audio to Watson STT");

        let response = self
            .client
            .post(&url)
            .query(&[("model", RECOGNIZE_MODEL)])
            .basic_auth("apikey", Some(self.api_key.expose_secret()))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| CompanionError::Transcription(format!("STT request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompanionError::Transcription(format!(
                "Watson STT error ({status}): {body}"
            )));
        }

        let body: RecognizeResponse = response.json().await.map_err(|e| {
            CompanionError::Transcription(format!("Failed to parse STT response: {e}"))
        })?;

        Ok(extract_transcript(&body))
    }
}

/// First alternative of the first result, or the no-speech marker.
fn extract_transcript(response: &RecognizeResponse) -> String {
    response
        .results
        .first()
        .and_then(|r| r.alternatives.first())
        .map(|a| a.transcript.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "No speech detected".to_string())
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
}
