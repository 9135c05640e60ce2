//! Mock AI client for tests and local development.
//!
//! Returns predefined responses without real API calls. This is the default
//! provider; it must never perform network I/O.

use async_trait::async_trait;

use super::AiClient;
use crate::types::{Result, SkillLevel};

#[derive(Debug, Default)]
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }

    /// Canned comment keyed by the raw level string. The serde boundary
    /// normalizes unknown levels to beginner, so the fallback arm is only
    /// reachable through direct string lookups.
    pub fn canned_comment(level: &str) -> &'static str {
        match level {
            "beginner" => {
                "MOCK RESPONSE (beginner): Good start! Add comments and descriptive variable names."
            }
            "intermediate" => {
                "MOCK RESPONSE (intermediate): Solid logic. Consider smaller functions and error handling."
            }
            "advanced" => {
                "MOCK RESPONSE (advanced): Algorithm is correct. Optimize data structures for performance."
            }
            _ => "MOCK RESPONSE: Unknown skill level.",
        }
    }
}

#[async_trait]
impl AiClient for MockClient {
    async fn get_comment(&self, _code: &str, level: SkillLevel) -> Result<String> {
        Ok(Self::canned_comment(level.as_str()).to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
