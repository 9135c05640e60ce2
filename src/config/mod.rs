//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. TOML config file (explicit or `codecompanion.toml`)
//! 3. Environment variables (CODECOMPANION_*)
//! 4. CLI arguments (highest priority, applied in `main`)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
