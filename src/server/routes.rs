//! Request Handlers
//!
//! Each handler maps a route to the core modules and translates failures into
//! the `{detail}` error body. The comment route is strict (any annotation
//! failure is a request failure), comment-line is lenient (failures degrade
//! into an error marker inside the returned code), and debug substitutes
//! documented defaults for fields the model skipped.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use tracing::{error, info, warn};

use super::AppState;
use crate::annotate::annotate_source;
use crate::constants::voice::{AUDIO_CONTENT_TYPE, MIN_AUDIO_BYTES};
use crate::debug::{DebugFields, parse_debug_output};
use crate::exec::run_snippet;
use crate::types::{
    CodeRequest, CommentResponse, CompanionError, DebugResponse, DocsResponse, DocumentResponse,
    ErrorResponse, HealthResponse, RunResponse, VoiceCommentRequest,
};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn internal_error(detail: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn bad_request(detail: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to the {} API", state.config.app_name),
        "docs": "/api/v1/docs_content",
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn docs_content() -> Json<DocsResponse> {
    Json(DocsResponse {
        title: "Code Companion API".to_string(),
        content: include_str!("../../docs/api.md").to_string(),
    })
}

/// Annotate each function and top-level statement with an AI comment.
pub async fn comment(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<CommentResponse>, HandlerError> {
    let client = state.clients.get().await.map_err(|e| {
        error!("Client construction failed: {e}");
        internal_error(e.to_string())
    })?;

    let annotation = annotate_source(&request.code, client.as_ref(), request.level)
        .await
        .map_err(|e| {
            error!("Annotation failed: {e}");
            internal_error(e.to_string())
        })?;

    Ok(Json(CommentResponse {
        comment: annotation.annotated_code,
        functions: annotation.functions,
        voice_comment: None,
    }))
}

/// Per-line annotation. Lenient: generation failure degrades into an error
/// marker appended to the submitted code instead of failing the request.
pub async fn comment_line(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> Json<CommentResponse> {
    let annotated = match line_comments(&state, &request).await {
        Ok(annotated) => annotated,
        Err(e) => {
            warn!("Line annotation failed, degrading: {e}");
            format!("{}  # Error: {e}", request.code)
        }
    };

    Json(CommentResponse {
        comment: annotated,
        functions: Vec::new(),
        voice_comment: None,
    })
}

async fn line_comments(state: &AppState, request: &CodeRequest) -> crate::types::Result<String> {
    let client = state.clients.get().await?;
    client.get_line_comments(&request.code, request.level).await
}

pub async fn document(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<DocumentResponse>, HandlerError> {
    let client = state
        .clients
        .get()
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    let documentation = client
        .get_documentation(&request.code, request.level)
        .await
        .map_err(|e| {
            error!("Documentation failed: {e}");
            internal_error(e.to_string())
        })?;

    Ok(Json(DocumentResponse { documentation }))
}

/// Debug workflow: run the snippet first; only ask the model when it fails.
///
/// AI unavailability is itself reported through the response shape rather
/// than a handler error, so the frontend always receives a `DebugResponse`.
pub async fn debug(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> Json<DebugResponse> {
    let ceiling = Duration::from_secs(state.config.exec.timeout_secs);
    let run = run_snippet(&state.config.exec.interpreter, &request.code, ceiling).await;

    if let Ok(outcome) = &run {
        if outcome.success() {
            info!("Snippet ran cleanly, nothing to debug");
            return Json(DebugResponse {
                fixed_code: request.code,
                error: None,
                explanation: None,
                suggestion: None,
            });
        }
    }

    let ai_output = match state.clients.get().await {
        Ok(client) => client.get_debug(&request.code, request.level).await,
        Err(e) => Err(e),
    };

    match ai_output {
        Ok(output) => {
            let fields = parse_debug_output(&output);
            Json(fill_debug_defaults(fields, &request.code))
        }
        Err(e) => {
            error!("AI debugging failed: {e}");
            Json(DebugResponse {
                fixed_code: request.code,
                error: Some(e.to_string()),
                explanation: Some("AI debugging failed. Please check your code manually.".to_string()),
                suggestion: None,
            })
        }
    }
}

/// Substitute documented defaults for fields the model did not emit.
fn fill_debug_defaults(fields: DebugFields, original_code: &str) -> DebugResponse {
    DebugResponse {
        fixed_code: fields
            .fixed_code
            .unwrap_or_else(|| original_code.to_string()),
        error: Some(fields.error.unwrap_or_else(|| "Error occurred".to_string())),
        explanation: Some(
            fields
                .explanation
                .unwrap_or_else(|| "No detailed explanation provided.".to_string()),
        ),
        suggestion: Some(
            fields
                .suggestion
                .unwrap_or_else(|| "Check your code and fix the error.".to_string()),
        ),
    }
}

pub async fn run(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<RunResponse>, HandlerError> {
    let ceiling = Duration::from_secs(state.config.exec.timeout_secs);

    match run_snippet(&state.config.exec.interpreter, &request.code, ceiling).await {
        Ok(outcome) => Ok(Json(RunResponse {
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            exit_code: outcome.exit_code,
        })),
        Err(CompanionError::Timeout { duration, .. }) => Err((
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse {
                detail: format!("Code execution timed out after {}s.", duration.as_secs()),
            }),
        )),
        Err(e) => {
            error!("Snippet execution failed: {e}");
            Err(internal_error(e.to_string()))
        }
    }
}

/// Voice workflow: decode audio, transcribe it, then annotate the code with
/// the spoken instructions prepended as context.
pub async fn voice_comment(
    State(state): State<AppState>,
    Json(request): Json<VoiceCommentRequest>,
) -> Result<Json<CommentResponse>, HandlerError> {
    let Some(stt) = &state.stt else {
        return Err(internal_error(
            "IBM Watson Speech-to-Text credentials missing",
        ));
    };

    let audio = BASE64
        .decode(&request.audio_base64)
        .map_err(|e| bad_request(format!("Invalid base64 audio payload: {e}")))?;

    if audio.len() < MIN_AUDIO_BYTES {
        return Err(bad_request("Recording too short or silent. Try again!"));
    }

    let spoken = stt
        .transcribe(&audio, AUDIO_CONTENT_TYPE)
        .await
        .map_err(|e| {
            error!("Transcription failed: {e}");
            internal_error(e.to_string())
        })?;

    info!(transcript = %spoken, "Transcribed voice instructions");

    let combined = format!("# Voice instructions:\n# {}\n{}", spoken, request.code);

    let client = state
        .clients
        .get()
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    let annotation = annotate_source(&combined, client.as_ref(), request.level)
        .await
        .map_err(|e| {
            error!("Annotation failed: {e}");
            internal_error(e.to_string())
        })?;

    Ok(Json(CommentResponse {
        comment: annotation.annotated_code,
        functions: annotation.functions,
        voice_comment: Some(spoken),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_defaults_fill_every_skipped_field() {
        let response = fill_debug_defaults(DebugFields::default(), "x = 1");
        assert_eq!(response.fixed_code, "x = 1");
        assert_eq!(response.error.as_deref(), Some("Error occurred"));
        assert_eq!(
            response.explanation.as_deref(),
            Some("No detailed explanation provided.")
        );
        assert_eq!(
            response.suggestion.as_deref(),
            Some("Check your code and fix the error.")
        );
    }

    #[test]
    fn debug_defaults_keep_extracted_fields() {
        let fields = DebugFields {
            fixed_code: Some("y = 2".to_string()),
            error: Some("NameError".to_string()),
            explanation: None,
            suggestion: None,
        };
        let response = fill_debug_defaults(fields, "x = 1");
        assert_eq!(response.fixed_code, "y = 2");
        assert_eq!(response.error.as_deref(), Some("NameError"));
        assert_eq!(
            response.explanation.as_deref(),
            Some("No detailed explanation provided.")
        );
    }
}
