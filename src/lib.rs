//! Code Companion
//!
//! Backend for an AI code companion aimed at learners: annotates Python
//! snippets with skill-level-tuned comments, generates documentation,
//! debugs failing code, runs snippets in a sandbox, and accepts voice
//! instructions via speech-to-text.
//!
//! ## Architecture
//!
//! - [`ai`]: provider abstraction (mock, Gemini, watsonx) behind the
//!   [`AiClient`] trait, with rate-limit retry and a memoized factory
//! - [`annotate`]: tree-sitter walk attaching comments to functions and
//!   top-level statements
//! - [`debug`]: structured-field extraction from debugging model output
//! - [`exec`]: sandboxed snippet execution with a hard timeout
//! - [`server`]: axum HTTP surface
//! - [`config`]: layered file/env configuration

pub mod ai;
pub mod annotate;
pub mod config;
pub mod constants;
pub mod debug;
pub mod exec;
pub mod server;
pub mod types;

pub use ai::{AiClient, ClientHandle, SharedClient, create_client};
pub use config::{Config, ConfigLoader, ProviderConfig};
pub use types::{CompanionError, Result, SkillLevel};
