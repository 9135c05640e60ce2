//! API data models
//!
//! Request and response shapes for the HTTP boundary. These map directly onto
//! JSON bodies; the core modules produce and consume them unchanged.

use serde::{Deserialize, Serialize};

use super::SkillLevel;

/// Inbound code payload shared by the comment, document, debug, and run routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    pub code: String,
    #[serde(default)]
    pub level: SkillLevel,
}

/// One AI-generated comment attached to a function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionComment {
    pub name: String,
    pub comment: String,
    pub level: SkillLevel,
}

/// Annotated code plus per-function comment records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: String,
    #[serde(default)]
    pub functions: Vec<FunctionComment>,
    #[serde(default)]
    pub voice_comment: Option<String>,
}

/// Structured debugging assistance extracted from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugResponse {
    pub fixed_code: String,
    pub error: Option<String>,
    pub explanation: Option<String>,
    pub suggestion: Option<String>,
}

/// Captured output of a sandboxed snippet run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub documentation: String,
}

/// Audio recording plus the code it narrates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommentRequest {
    pub audio_base64: String,
    pub code: String,
    #[serde(default)]
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsResponse {
    pub title: String,
    pub content: String,
}

/// JSON error body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_request_defaults_level() {
        let request: CodeRequest = serde_json::from_str(r#"{"code": "x = 1"}"#).unwrap();
        assert_eq!(request.level, SkillLevel::Beginner);

        let request: CodeRequest =
            serde_json::from_str(r#"{"code": "x = 1", "level": "wizard"}"#).unwrap();
        assert_eq!(request.level, SkillLevel::Beginner);
    }

    #[test]
    fn debug_response_serializes_absent_fields_as_null() {
        let response = DebugResponse {
            fixed_code: "x = 1".to_string(),
            error: None,
            explanation: None,
            suggestion: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["error"].is_null());
        assert_eq!(json["fixed_code"], "x = 1");
    }
}
