//! Core Types
//!
//! Shared data model: skill levels, API request/response shapes, and the
//! unified error type.

pub mod api;
pub mod error;
pub mod skill;

pub use api::{
    CodeRequest, CommentResponse, DebugResponse, DocsResponse, DocumentResponse, ErrorResponse,
    FunctionComment, HealthResponse, RunResponse, VoiceCommentRequest,
};
pub use error::{CompanionError, Result, is_rate_limit_message};
pub use skill::SkillLevel;
